//! ZTE C300/C320 GPON OLT platform definition.
//!
//! # Dialog examples
//!
//! ```text
//! OLT(config-if)#reboot
//! Confirm to reboot the ONU? [yes/no]:yes
//!
//! OLT#show pon onu uncfg
//! %Code 32310-GPONSRV : No related information to show.
//!
//! OLT(config-if)#onu 3 type ZTE sn ZTEGC0FFEE01
//! %Code 32315-GPONSRV : The entry is existed.
//! ```

use crate::platform::OltPlatform;

/// Platform name for ZTE C300-class OLTs.
pub const PLATFORM_NAME: &str = "zte_c300";

/// Create the ZTE C300 platform definition.
pub fn platform() -> OltPlatform {
    OltPlatform::new(PLATFORM_NAME)
        .with_confirmation_phrase("Confirm")
        .with_confirmation_phrase("Are you sure")
        .with_yes_no_marker("[yes/no]")
        .with_yes_no_marker("(y/n)")
        .with_affirmative_reply("yes")
        .with_login_prompts("Username:", "Password:")
        .with_no_data_marker("No related information to show")
        .with_error_code_prefix("%Code")
        .with_already_exists_marker("entry is existed")
        .with_already_exists_marker("already exists")
        .with_already_exists_marker("The service is already existed")
        .with_fragment_depth(1000)
}
