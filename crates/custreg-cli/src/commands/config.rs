use anyhow::Result;
use colored::Colorize;

use super::Context;

pub fn path(ctx: &Context) {
    println!("{}", ctx.service.path().display());
}

pub fn show(ctx: &Context) -> Result<()> {
    let mut config = ctx.config.clone();
    config.supabase = config.supabase.redacted();
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

pub fn init(ctx: &Context) -> Result<()> {
    let existed = ctx.service.path().exists();
    let path = ctx.service.ensure_config_file()?;
    if existed {
        println!("{}", format!("Config already exists: {}", path.display()).yellow());
    } else {
        println!("{}", format!("Created {}", path.display()).bright_green());
    }
    Ok(())
}
