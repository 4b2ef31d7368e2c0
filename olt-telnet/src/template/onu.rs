//! ONU provisioning command blocks.
//!
//! The device CLI is strict and positional; the text produced here is sent
//! line by line exactly as written. Configuration blocks close with `end`
//! followed by `wr` so the change survives a reload.

use super::index::{OltIndex, OnuTarget};

/// ONU type profile registered on the OLT for subscriber units.
const ONU_TYPE: &str = "ZTE";

/// Upstream bandwidth profile bound to the service T-CONT.
const TCONT_PROFILE: &str = "1G";

/// PPPoE internet service with TR-069 remote management.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PppoeProfile {
    /// VLAN carrying subscriber PPPoE traffic.
    pub internet_vlan: u16,

    /// VLAN carrying TR-069 management traffic.
    pub management_vlan: u16,

    /// ACS endpoint the ONU reports to.
    pub acs_url: String,

    /// PPPoE password; the username is the subscriber access code.
    pub pppoe_password: String,
}

impl PppoeProfile {
    /// Profile with the usual VLAN plan (internet 800, management 100).
    pub fn new(acs_url: impl Into<String>, pppoe_password: impl Into<String>) -> Self {
        Self {
            internet_vlan: 800,
            management_vlan: 100,
            acs_url: acs_url.into(),
            pppoe_password: pppoe_password.into(),
        }
    }

    /// Set the management VLAN.
    pub fn with_management_vlan(mut self, vlan: u16) -> Self {
        self.management_vlan = vlan;
        self
    }
}

/// Which service layout an activation provisions.
///
/// Sites run different layouts; the caller picks one explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceProfile {
    /// Routed PPPoE WAN plus TR-069 management.
    Pppoe(PppoeProfile),
    /// Single bridged service VLAN tagged on the first Ethernet port.
    Bridge { vlan: u16 },
}

/// Everything an activation needs besides the ONU address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationDetails {
    /// ONU serial number as reported by the unconfigured scan.
    pub serial_number: String,

    /// Region label written into the ONU description.
    pub region: String,

    /// Subscriber access code, used as ONU name and PPPoE username.
    pub code: String,

    /// Overrides the profile's service VLAN when set.
    pub vlan_id: Option<u16>,

    /// Service layout.
    pub profile: ServiceProfile,
}

/// Build the activation block for `target`.
pub fn activate(target: &OnuTarget, details: &ActivationDetails) -> String {
    let olt = target.olt;
    let mut lines = vec![
        "con t".to_string(),
        format!("interface {olt}"),
        format!("onu {} type {ONU_TYPE} sn {}", target.onu, details.serial_number),
        "exit".to_string(),
        format!("interface {target}"),
        format!("name {}", details.code),
        format!("description zone {}", details.region),
    ];

    match &details.profile {
        ServiceProfile::Pppoe(profile) => {
            let inet = details.vlan_id.unwrap_or(profile.internet_vlan);
            let mgmt = profile.management_vlan;
            lines.extend([
                format!("tcont 3 profile {TCONT_PROFILE}"),
                "gemport 1 tcont 3".to_string(),
                format!("service-port 1 vport 1 user-vlan {inet} vlan {inet}"),
                format!("service-port 2 vport 1 user-vlan {mgmt} vlan {mgmt}"),
                "exit".to_string(),
                String::new(),
                format!("pon-onu-mng {target}"),
                format!("service 1 gemport 1 vlan {inet}"),
                format!("service TR069 gemport 1 vlan {mgmt}"),
                format!("wan-ip 2 mode dhcp vlan-profile {mgmt} host 2"),
                format!("tr069-mgmt 1 acs {}", profile.acs_url),
                "security-mgmt 212 state enable mode forward protocol web".to_string(),
                format!(
                    "wan-ip 1 mode pppoe username {} password {} vlan-profile {inet} host 1",
                    details.code, profile.pppoe_password
                ),
                "wan 1 ethuni 1 ssid 1 service internet host 1".to_string(),
            ]);
        }
        ServiceProfile::Bridge { vlan } => {
            let vlan = details.vlan_id.unwrap_or(*vlan);
            lines.extend([
                format!("tcont 1 profile {TCONT_PROFILE}"),
                "gemport 1 tcont 1".to_string(),
                format!("service-port 1 vport 1 user-vlan {vlan} vlan {vlan}"),
                "exit".to_string(),
                String::new(),
                format!("pon-onu-mng {target}"),
                format!("service 1 gemport 1 vlan {vlan}"),
                format!("vlan port eth_0/1 mode tag vlan {vlan}"),
            ]);
        }
    }

    lines.push("end".to_string());
    lines.push("wr".to_string());
    lines.join("\n")
}

/// Build the block that reboots `target`. The device asks for confirmation.
pub fn reboot(target: &OnuTarget) -> String {
    [
        "con t".to_string(),
        format!("pon-onu-mng {target}"),
        "reboot".to_string(),
        "end".to_string(),
    ]
    .join("\n")
}

/// Build the block that deregisters `target` and persists the change.
pub fn remove(target: &OnuTarget) -> String {
    [
        "con t".to_string(),
        format!("interface {}", target.olt),
        format!("no onu {}", target.onu),
        "end".to_string(),
        "wr".to_string(),
    ]
    .join("\n")
}

/// ONU state table for one PON port.
pub fn show_onu_state(olt: &OltIndex) -> String {
    format!("show gpon onu state {olt}")
}

/// Discovered but unconfigured ONUs on all ports.
pub fn show_unconfigured() -> String {
    "show pon onu uncfg".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> OnuTarget {
        OnuTarget::new(OltIndex::new(1, 2), 5).unwrap()
    }

    fn pppoe_details() -> ActivationDetails {
        ActivationDetails {
            serial_number: "ZTEGC0FFEE01".into(),
            region: "north".into(),
            code: "cust0042".into(),
            vlan_id: None,
            profile: ServiceProfile::Pppoe(PppoeProfile::new("http://10.0.0.3:7547", "s3cret")),
        }
    }

    #[test]
    fn test_activate_pppoe_exact_text() {
        let expected = "\
con t
interface gpon-olt_1/1/2
onu 5 type ZTE sn ZTEGC0FFEE01
exit
interface gpon-onu_1/1/2:5
name cust0042
description zone north
tcont 3 profile 1G
gemport 1 tcont 3
service-port 1 vport 1 user-vlan 800 vlan 800
service-port 2 vport 1 user-vlan 100 vlan 100
exit

pon-onu-mng gpon-onu_1/1/2:5
service 1 gemport 1 vlan 800
service TR069 gemport 1 vlan 100
wan-ip 2 mode dhcp vlan-profile 100 host 2
tr069-mgmt 1 acs http://10.0.0.3:7547
security-mgmt 212 state enable mode forward protocol web
wan-ip 1 mode pppoe username cust0042 password s3cret vlan-profile 800 host 1
wan 1 ethuni 1 ssid 1 service internet host 1
end
wr";
        assert_eq!(activate(&target(), &pppoe_details()), expected);
    }

    #[test]
    fn test_activate_vlan_override() {
        let mut details = pppoe_details();
        details.vlan_id = Some(812);
        let text = activate(&target(), &details);
        assert!(text.contains("service-port 1 vport 1 user-vlan 812 vlan 812"));
        assert!(text.contains("vlan-profile 812 host 1"));
        // Management VLAN is untouched.
        assert!(text.contains("service TR069 gemport 1 vlan 100"));
    }

    #[test]
    fn test_activate_bridge() {
        let mut details = pppoe_details();
        details.profile = ServiceProfile::Bridge { vlan: 300 };
        let text = activate(&target(), &details);
        assert!(text.contains("vlan port eth_0/1 mode tag vlan 300"));
        assert!(!text.contains("pppoe"));
        assert!(text.ends_with("end\nwr"));
    }

    #[test]
    fn test_activate_is_deterministic() {
        let details = pppoe_details();
        let first = activate(&target(), &details);
        for _ in 0..10 {
            assert_eq!(activate(&target(), &details), first);
        }
    }

    #[test]
    fn test_reboot_text() {
        assert_eq!(
            reboot(&target()),
            "con t\npon-onu-mng gpon-onu_1/1/2:5\nreboot\nend"
        );
    }

    #[test]
    fn test_remove_text() {
        assert_eq!(
            remove(&target()),
            "con t\ninterface gpon-olt_1/1/2\nno onu 5\nend\nwr"
        );
    }

    #[test]
    fn test_scan_commands() {
        assert_eq!(
            show_onu_state(&OltIndex::new(1, 3)),
            "show gpon onu state gpon-olt_1/1/3"
        );
        assert_eq!(show_unconfigured(), "show pon onu uncfg");
    }
}
