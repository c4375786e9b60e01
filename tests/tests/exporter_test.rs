use std::{fs, path::PathBuf};

use alloy_primitives::Address;
use helpers::registry;
use tests::write_record;

#[test]
fn export_is_idempotent() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let pinned = dir.path().join("pinned");
    let deployed = dir.path().join("deployed");
    write_record(&pinned, "Pinned", Address::from([0x11; 20]));
    write_record(&deployed, "Storage", Address::from([0x22; 20]));
    write_record(&deployed, "Other", Address::from([0x33; 20]));

    let dirs = [pinned, deployed];
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");
    registry::export(&dirs, &first)?.expect("records found");
    registry::export(&dirs, &second)?.expect("records found");

    assert_eq!(fs::read_to_string(&first)?, fs::read_to_string(&second)?);
    Ok(())
}

#[test]
fn no_records_warns_without_writing() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let out = dir.path().join("contracts.json");
    let dirs = [
        dir.path().join("pinned-does-not-exist"),
        dir.path().join("deployed-does-not-exist"),
    ];

    let written = registry::export(&dirs, &out)?;
    assert!(written.is_none());
    assert!(!out.exists());
    Ok(())
}

#[test]
fn deployed_records_override_pinned_ones() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let pinned = dir.path().join("pinned");
    let deployed = dir.path().join("deployed");
    let address = Address::from([0x44; 20]);
    write_record(&pinned, "PinnedName", address);
    write_record(&deployed, "DeployedName", address);

    let records = registry::collect_records(&[pinned, deployed])?;
    assert_eq!(records.len(), 1);
    let (_, value) = records.iter().next().unwrap();
    assert_eq!(value["name"], "DeployedName");
    Ok(())
}

#[test]
fn files_not_named_by_address_are_skipped() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let deployed = dir.path().join("deployed");
    fs::create_dir_all(&deployed)?;
    fs::write(deployed.join("notes.json"), "{}")?;
    fs::write(deployed.join("0xreadme.txt"), "not json")?;
    write_record(&deployed, "Storage", Address::from([0x55; 20]));

    let records = registry::collect_records(&[deployed])?;
    assert_eq!(records.len(), 1);
    Ok(())
}

#[test]
fn one_missing_directory_is_tolerated() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let deployed = dir.path().join("deployed");
    write_record(&deployed, "Storage", Address::from([0x66; 20]));

    let dirs: [PathBuf; 2] = [dir.path().join("pinned"), deployed];
    let records = registry::collect_records(&dirs)?;
    assert_eq!(records.len(), 1);
    Ok(())
}
