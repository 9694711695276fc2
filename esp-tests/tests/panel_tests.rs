//! Integration Tests für das LED-Panel
//!
//! Diese Tests laufen auf dem Host (x86_64) und nutzen MockPin

use core::net::Ipv4Addr;

use esp_core::{
    IP_PATH, IpResponse, LedController, OutputPin, PanelReply, PanelRoute, PinLevel, ROOT_PATH,
    STATE_PATH, StateResponse, TOGGLE_PATH, dispatch, get_ip, get_state, toggle,
};

// ============================================================================
// Mock Pin
// ============================================================================

#[derive(Default)]
pub struct MockPin {
    pub level: PinLevel,
    pub write_count: usize,
}

impl MockPin {
    /// Pin, der vor der Übernahme schon HIGH war (z.B. nach Soft-Reset)
    pub fn high() -> Self {
        Self {
            level: PinLevel::High,
            write_count: 0,
        }
    }
}

impl OutputPin for MockPin {
    fn level(&self) -> PinLevel {
        self.level
    }

    fn set_level(&mut self, level: PinLevel) {
        self.level = level;
        self.write_count += 1;
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json_core::to_string::<_, 64>(value)
        .unwrap()
        .as_str()
        .to_owned()
}

// ============================================================================
// Tests: Boot-Zustand
// ============================================================================

#[test]
fn test_controller_drives_pin_low_on_boot() {
    let led = LedController::new(MockPin::high());
    assert_eq!(led.pin().level, PinLevel::Low);
    assert_eq!(led.pin().write_count, 1);
    assert_eq!(get_state(&led).state, 0);
}

// ============================================================================
// Tests: get_state()
// ============================================================================

#[test]
fn test_state_reads_do_not_write() {
    let led = LedController::new(MockPin::default());
    let writes = led.pin().write_count;

    for _ in 0..5 {
        assert_eq!(get_state(&led), StateResponse { state: 0 });
    }
    assert_eq!(led.pin().write_count, writes);
}

#[test]
fn test_state_follows_pin_level() {
    let mut led = LedController::new(MockPin::default());
    toggle(&mut led);
    assert_eq!(get_state(&led).state, u8::from(led.pin().level.is_on()));
}

// ============================================================================
// Tests: toggle()
// ============================================================================

#[test]
fn test_toggle_flips_and_reports_new_state() {
    let mut led = LedController::new(MockPin::default());

    for _ in 0..4 {
        let before = get_state(&led).state;
        let after = toggle(&mut led).state;
        assert_eq!(after, before ^ 1);
        // Lesen nach Schreiben: GET /state zeigt den Wert von /toggle
        assert_eq!(get_state(&led).state, after);
    }
}

#[test]
fn test_toggle_writes_pin_once() {
    let mut led = LedController::new(MockPin::default());
    let writes = led.pin().write_count;
    toggle(&mut led);
    assert_eq!(led.pin().write_count, writes + 1);
}

#[test]
fn test_scenario_state_toggle_toggle() {
    let mut led = LedController::new(MockPin::default());

    assert_eq!(to_json(&get_state(&led)), r#"{"state":0}"#);
    assert_eq!(to_json(&toggle(&mut led)), r#"{"state":1}"#);
    assert_eq!(to_json(&get_state(&led)), r#"{"state":1}"#);
    assert_eq!(to_json(&toggle(&mut led)), r#"{"state":0}"#);
    assert_eq!(to_json(&get_state(&led)), r#"{"state":0}"#);
}

// ============================================================================
// Tests: get_ip()
// ============================================================================

#[test]
fn test_ip_reports_assigned_address() {
    let ip = get_ip(Some(Ipv4Addr::new(192, 168, 1, 42)));
    assert!(ip.is_assigned());
    assert_eq!(to_json(&ip), r#"{"ip":"192.168.1.42"}"#);
}

#[test]
fn test_ip_longest_address_fits() {
    let ip = IpResponse::from_address(Some(Ipv4Addr::new(255, 255, 255, 255)));
    assert_eq!(ip.ip.as_str(), "255.255.255.255");
}

#[test]
fn test_ip_empty_without_address() {
    let ip = get_ip(None);
    assert!(!ip.is_assigned());
    assert_eq!(to_json(&ip), r#"{"ip":""}"#);
}

// ============================================================================
// Tests: Routen und Web-Oberfläche
// ============================================================================

#[test]
fn test_route_paths() {
    assert_eq!(ROOT_PATH, "/");
    assert_eq!(STATE_PATH, "/state");
    assert_eq!(TOGGLE_PATH, "/toggle");
    assert_eq!(IP_PATH, "/ip");
}

#[test]
fn test_unknown_paths_have_no_route() {
    for path in ["/nope", "/state/", "/STATE", "/toggle?x=1", ""] {
        assert_eq!(PanelRoute::from_path(path), None, "{}", path);
    }
}

/// Simuliert eine Anfrage wie der HTTP-Server: Pfad → Route → Handler
fn request(path: &str, led: &mut LedController<MockPin>) -> Option<PanelReply> {
    let route = PanelRoute::from_path(path)?;
    Some(dispatch(route, led, || Some(Ipv4Addr::new(10, 0, 0, 7))))
}

#[test]
fn test_nope_is_not_found() {
    let mut led = LedController::new(MockPin::default());
    assert_eq!(request("/nope", &mut led), None);
    assert_eq!(get_state(&led).state, 0);
}

#[test]
fn test_toggle_route_flips_and_state_route_reads() {
    let mut led = LedController::new(MockPin::default());
    let writes = led.pin().write_count;

    assert_eq!(
        request("/state", &mut led),
        Some(PanelReply::State(StateResponse { state: 0 }))
    );
    assert_eq!(led.pin().write_count, writes);

    assert_eq!(
        request("/toggle", &mut led),
        Some(PanelReply::State(StateResponse { state: 1 }))
    );
    assert_eq!(led.pin().write_count, writes + 1);

    assert_eq!(
        request("/state", &mut led),
        Some(PanelReply::State(StateResponse { state: 1 }))
    );
}

#[test]
fn test_root_and_ip_routes_leave_pin_alone() {
    let mut led = LedController::new(MockPin::default());
    let writes = led.pin().write_count;

    assert_eq!(request("/", &mut led), Some(PanelReply::Page));
    match request("/ip", &mut led) {
        Some(PanelReply::Ip(ip)) => assert_eq!(ip.ip.as_str(), "10.0.0.7"),
        other => panic!("Expected Ip reply, got {:?}", other),
    }
    assert_eq!(led.pin().write_count, writes);
}

#[test]
fn test_ip_address_only_read_for_ip_route() {
    let mut led = LedController::new(MockPin::default());
    for route in [PanelRoute::Root, PanelRoute::State, PanelRoute::Toggle] {
        dispatch(route, &mut led, || panic!("address read for {:?}", route));
    }
}

const INDEX_HTML: &str = include_str!("../../esp-firmware/src/web/index.html");

#[test]
fn test_index_page_identity_and_endpoints() {
    assert!(INDEX_HTML.contains("ESP32"));
    for path in ["'/state'", "'/toggle'", "'/ip'"] {
        assert!(INDEX_HTML.contains(path), "missing fetch of {}", path);
    }
}

#[test]
fn test_index_page_polls_every_five_seconds() {
    assert!(INDEX_HTML.contains("POLL_INTERVAL_MS = 5000"));
    assert!(INDEX_HTML.contains("setInterval(fetchState, POLL_INTERVAL_MS)"));
}

#[test]
fn test_index_page_reenables_toggle_button() {
    assert!(INDEX_HTML.contains("toggleBtn.disabled = true"));
    assert!(INDEX_HTML.contains("finally"));
    assert!(INDEX_HTML.contains("toggleBtn.disabled = false"));
}
