fn main() -> anyhow::Result<()> {
    if std::env::args().skip(1).any(|a| a == "--write-config") {
        let path = originscan_lib::write_config()?;
        println!("Wrote config: {}", path.display());
        return Ok(());
    }
    originscan_lib::run()
}
