use anyhow::Result;

use taskdeck::api::MockApi;

use super::accept;

pub fn login(api: &mut MockApi, email: &str, password: &str) -> Result<()> {
    let envelope = api.login(email, password)?;
    let message = envelope.message.clone();
    let user = accept(envelope)?;
    println!(
        "{} as {} <{}>",
        message.as_deref().unwrap_or("Logged in"),
        user.name,
        user.email
    );
    Ok(())
}

pub fn logout(api: &mut MockApi) -> Result<()> {
    if !api.is_authenticated() {
        println!("Not logged in.");
        return Ok(());
    }
    accept(api.logout()?)?;
    println!("Logged out.");
    Ok(())
}

pub fn whoami(api: &MockApi) -> Result<()> {
    match api.current_user() {
        Some(user) if api.is_authenticated() => {
            println!("{} <{}> (id {})", user.name, user.email, user.id);
        }
        _ => println!("Not logged in."),
    }
    Ok(())
}
