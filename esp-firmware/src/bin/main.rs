// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (WiFi benötigt dynamischen Speicher)
extern crate alloc;

// Embassy Async Runtime
use defmt::{Debug2Format, info};
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, Ipv4Cidr, StackResources, StaticConfigV4};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use esp_led_panel::config::{
    AP_IP, AP_PREFIX_LEN, AP_SSID, EXTRA_HEAP_SIZE, LED_GPIO_PIN, PORTAL_TIMEOUT_SECS,
    WIFI_HEAP_SIZE,
};
use esp_led_panel::hal::GpioLed;
use esp_led_panel::provisioning::{WifiManager, restart_after_failure};
use esp_led_panel::tasks::{http_server, link_monitor_task, net_task};
use esp_led_panel::Provisioning;

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware und WiFi, durchläuft die Bereitstellung
/// (Provisioning → Serving) und bedient danach das LED-Panel.
/// Scheitert die Bereitstellung, startet der Chip neu.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Heap Allocator initialisieren (WiFi braucht dynamischen Speicher!)
    // Zwei Bereiche: reclaimed RAM (64 KB) + extra (36 KB) = 100 KB total
    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // LED zuerst: sie ist ab Boot definiert aus
    info!("LED: GPIO{} configured as output", LED_GPIO_PIN);
    let provisioning = Provisioning::new(GpioLed::new(peripherals.GPIO2));

    // WiFi Hardware initialisieren
    static RADIO_INIT: static_cell::StaticCell<esp_radio::Controller> =
        static_cell::StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));

    let (wifi_controller, wifi_interface) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    // Random seeds für die TCP/IP Stacks (von Hardware RNG)
    let rng = Rng::new();
    let sta_seed = (rng.random() as u64) << 32 | rng.random() as u64;
    let ap_seed = (rng.random() as u64) << 32 | rng.random() as u64;

    // STA-Stack (Heimnetz): DHCP-Client + ein HTTP-Listener
    static STA_RESOURCES: static_cell::StaticCell<StackResources<4>> =
        static_cell::StaticCell::new();
    let (sta_stack, sta_runner) = embassy_net::new(
        wifi_interface.sta,
        NetConfig::dhcpv4(Default::default()),
        STA_RESOURCES.init(StackResources::new()),
        sta_seed,
    );

    // AP-Stack (Setup-Portal): statische Adresse, HTTP + DHCP-Server + DNS
    static AP_RESOURCES: static_cell::StaticCell<StackResources<4>> =
        static_cell::StaticCell::new();
    let (ap_stack, ap_runner) = embassy_net::new(
        wifi_interface.ap,
        NetConfig::ipv4_static(StaticConfigV4 {
            address: Ipv4Cidr::new(AP_IP, AP_PREFIX_LEN),
            gateway: Some(AP_IP),
            dns_servers: Default::default(),
        }),
        AP_RESOURCES.init(StackResources::new()),
        ap_seed,
    );

    spawner.spawn(net_task(sta_runner)).unwrap();
    spawner.spawn(net_task(ap_runner)).unwrap();

    // Provisioning → Serving (oder Neustart)
    let manager = WifiManager::new(wifi_controller, sta_stack, ap_stack);
    let serving = match provisioning
        .acquire_network(manager, AP_SSID, PORTAL_TIMEOUT_SECS)
        .await
    {
        Ok(serving) => serving,
        Err(error) => restart_after_failure(error).await,
    };

    let (led, uplink) = serving.into_parts();
    info!("Connected! IP address: {}", Debug2Format(&uplink.address));

    // Verbindung überwachen und bei Abbruch neu verbinden
    spawner
        .spawn(link_monitor_task(uplink.controller, uplink.credentials.ssid))
        .unwrap();

    // HTTP-Server läuft für immer im Serving-Kontext
    http_server(uplink.stack, led).await
}
