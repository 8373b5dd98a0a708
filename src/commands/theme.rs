use anyhow::Result;

use taskdeck::api::MockApi;
use taskdeck::session::Theme;

pub fn show(api: &MockApi) -> Result<()> {
    println!("Theme: {}", api.theme());
    Ok(())
}

pub fn toggle(api: &mut MockApi) -> Result<()> {
    let theme = api.toggle_theme();
    println!("Theme: {}", theme);
    Ok(())
}

pub fn set(api: &mut MockApi, theme: &str) -> Result<()> {
    let theme: Theme = theme.parse()?;
    api.set_theme(theme);
    println!("Theme: {}", theme);
    Ok(())
}
