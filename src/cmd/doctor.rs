use anyhow::Result;

use docbridge::{Config, ConverterLocator, Soffice, Workspace};

pub async fn cmd_doctor(config: &Config) -> Result<()> {
    println!("🩺 docbridge {}\n", docbridge::VERSION);

    match ConverterLocator::from_config(config).locate() {
        Ok(path) => {
            let soffice = Soffice::new(&path).with_timeout(config.timeout());
            let status = if soffice.check_available().await {
                "✅"
            } else {
                "⚠️  does not answer --version"
            };
            println!("   Converter: {} {status}", path.display());
        }
        Err(e) => println!("   Converter: ❌ {e}"),
    }

    let workspace = Workspace::new(&config.workspace_dir);
    match workspace.create_scratch_dir().await {
        Ok(dir) => println!("   Workspace: {} ✅", dir.display()),
        Err(e) => println!("   Workspace: ❌ {e}"),
    }
    println!("   Timeout:   {}s", config.timeout_secs);
    println!("   Isolated profile: {}", config.isolate_profile);

    Ok(())
}
