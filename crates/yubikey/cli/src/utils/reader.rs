use colored::Colorize;
use ykprobe_apdu_transport_pcsc::{PcscDeviceManager, PcscError, PcscReader};

/// Find a reader with a specific name
pub fn find_reader_by_name(
    manager: &PcscDeviceManager,
    reader_name: &str,
) -> Result<PcscReader, Box<dyn std::error::Error>> {
    let readers = manager.list_readers()?;

    readers
        .iter()
        .find(|r| r.name() == reader_name)
        .cloned()
        .ok_or_else(|| format!("Reader '{}' not found", reader_name).into())
}

/// Find the first YubiKey reader with a card present
pub fn find_yubikey_reader(
    manager: &PcscDeviceManager,
) -> Result<PcscReader, Box<dyn std::error::Error>> {
    manager
        .list_yubikey_readers()?
        .into_iter()
        .next()
        .ok_or_else(|| "No YubiKey found!".into())
}

/// List all available readers
pub fn list_readers(manager: &PcscDeviceManager) -> Result<(), Box<dyn std::error::Error>> {
    let readers = match manager.list_readers() {
        Ok(readers) => readers,
        Err(PcscError::NoReadersAvailable) => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    if readers.is_empty() {
        println!("No readers found!");
        return Ok(());
    }

    println!("{}", "Available readers:".bold().underline());
    for (i, reader) in readers.iter().enumerate() {
        let status = if reader.has_card() {
            "card present"
        } else {
            "no card"
        };
        let name = if reader.is_yubikey() {
            reader.name().green().bold()
        } else {
            reader.name().normal()
        };
        println!("{}. {} ({})", i + 1, name, status);
    }

    Ok(())
}
