//! Text rendering for the `info` command

use ykprobe_device::{Capability, DeviceIdentity, FipsStatus, Interface, ProductId};

fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

/// Name shown for the device
pub fn device_name(product_id: Option<ProductId>, identity: &DeviceIdentity) -> &'static str {
    match product_id {
        Some(pid) if pid.is_yk4() && identity.is_fips_version() => "YubiKey FIPS",
        Some(pid) => pid.device_type(),
        None => "YubiKey",
    }
}

/// General device information, one fact per line
pub fn device_summary(product_id: Option<ProductId>, identity: &DeviceIdentity) -> String {
    let mut lines = vec![format!("Device type: {}", device_name(product_id, identity))];
    lines.push(match identity.serial {
        Some(serial) => format!("Serial number: {serial}"),
        None => "Serial number: Not set or unreadable".to_string(),
    });
    lines.push(match identity.version {
        Some(version) => format!("Firmware version: {version}"),
        None => "Firmware version: Uncertain, re-run with only one YubiKey connected".to_string(),
    });
    if let Some(form_factor) = identity.form_factor {
        lines.push(format!("Form factor: {form_factor}"));
    }
    lines.push(format!("Enabled USB interfaces: {}", identity.mode));
    if identity.supported.contains_key(&Interface::Nfc) {
        let state = if identity.enabled_on(Interface::Nfc).is_empty() {
            "disabled"
        } else {
            "enabled"
        };
        lines.push(format!("NFC interface is {state}."));
    }
    if identity.config_locked {
        lines.push("Configured applications are protected by a lock code.".to_string());
    }
    lines.join("\n")
}

fn app_status(supported: u16, enabled: u16, app: Capability) -> &'static str {
    if supported & app.bits() == 0 {
        "Not available"
    } else if enabled & app.bits() != 0 {
        "Enabled"
    } else {
        "Disabled"
    }
}

/// Application status per interface, with an NFC column only when NFC is supported
pub fn app_status_table(identity: &DeviceIdentity) -> String {
    let usb_supported = identity.supported_on(Interface::Usb).bits();
    let usb_enabled = identity.enabled_on(Interface::Usb).bits();
    let nfc_supported = identity.supported_on(Interface::Nfc).bits();
    let nfc_enabled = identity.enabled_on(Interface::Nfc).bits();

    let rows: Vec<Vec<&str>> = Capability::APPLICATIONS
        .iter()
        .map(|&app| {
            let mut row = vec![app.name(), app_status(usb_supported, usb_enabled, app)];
            if nfc_supported != 0 {
                row.push(app_status(nfc_supported, nfc_enabled, app));
            }
            row
        })
        .collect();

    let mut widths: Vec<usize> = Vec::new();
    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            match widths.get_mut(idx) {
                Some(width) => *width = (*width).max(cell.len()),
                None => widths.push(cell.len()),
            }
        }
    }

    let mut out = if nfc_supported != 0 {
        format!(
            "{:<w0$}\t{:<w1$}\t{:<w2$}\n",
            "Applications",
            "USB",
            "NFC",
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2]
        )
    } else {
        format!("{:<w0$}\n", "Applications", w0 = widths[0])
    };

    for row in &rows {
        let line: String = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}\t"))
            .collect();
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Overall FIPS approved mode followed by the sorted per-application breakdown
///
/// Applications that could not be checked show as such, and leave the overall
/// verdict unknown unless another application already failed.
pub fn fips_status(status: &FipsStatus) -> String {
    let overall = status.overall().map_or("Unknown", yes_no);
    let mut lines = vec![format!("FIPS Approved Mode: {overall}")];
    lines.extend(
        status
            .breakdown()
            .map(|(app, approved)| format!("  {app}: {}", approved.map_or("Not checked", yes_no))),
    );
    lines.join("\n")
}
