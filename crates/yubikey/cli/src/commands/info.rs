//! `info` command: device identity, applications and FIPS mode

use std::error::Error;

use tracing::{debug, info, warn};
use ykprobe_apdu_transport_pcsc::{PcscDeviceManager, PcscReader};
use ykprobe_device::{CcidDriver, ProductId, check_fips_status};

use crate::utils::{display, enumerator::SystemEnumerator};

/// Show general information about the YubiKey behind `reader`
pub fn info_command(
    manager: &PcscDeviceManager,
    reader: &PcscReader,
    check_fips: bool,
) -> Result<(), Box<dyn Error>> {
    let transport = manager.open_reader(reader.name())?;
    let mut driver = CcidDriver::new(transport, reader.name())?;
    let product_id = ProductId::from_name_and_mode(reader.name(), driver.mode());
    debug!(?product_id, "Resolved product id");

    let identity = driver.read_identity(product_id);
    // The FIPS scan opens its own connections, this one must be gone first
    driver.close()?;
    let identity = identity?;

    println!("{}", display::device_summary(product_id, &identity));
    println!();
    print!("{}", display::app_status_table(&identity));

    if check_fips {
        let Some(product_id) = product_id else {
            warn!("Unknown product id, cannot match devices for the FIPS check");
            return Ok(());
        };

        let enumerator = SystemEnumerator::new(manager);
        match check_fips_status(&enumerator, product_id, &identity)? {
            Some(status) => {
                println!();
                println!("{}", display::fips_status(&status));
            }
            None => info!("Firmware is not a FIPS build, skipping FIPS check"),
        }
    }

    Ok(())
}
