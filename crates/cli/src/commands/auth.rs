//! Session commands: login, register, logout, whoami.

use std::error::Error;

use candy_market_storefront::auth;
use secrecy::{ExposeSecret, SecretString};

use super::{Context, output};

/// Log in, prompting for the password when it was not given.
pub async fn login(
    ctx: &mut Context,
    email: &str,
    password: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let password = match password {
        Some(password) => SecretString::from(password),
        None => SecretString::from(output::prompt("Contraseña: ")?),
    };

    let user = auth::login(
        ctx.gateway.as_ref(),
        &mut ctx.session,
        email,
        password.expose_secret(),
    )
    .await?;

    output::info("Sesión iniciada.");
    output::user(&user);
    Ok(())
}

/// Register, optionally logging in right after.
pub async fn register(
    ctx: &mut Context,
    email: &str,
    password: &str,
    then_login: bool,
) -> Result<(), Box<dyn Error>> {
    if then_login {
        let user =
            auth::register_and_login(ctx.gateway.as_ref(), &mut ctx.session, email, password)
                .await?;
        output::info("Cuenta creada y sesión iniciada.");
        output::user(&user);
    } else {
        auth::register(ctx.gateway.as_ref(), email, password).await?;
        output::info("Cuenta creada. Ya puedes iniciar sesión.");
    }
    Ok(())
}

pub fn logout(ctx: &mut Context) -> Result<(), Box<dyn Error>> {
    ctx.session.logout()?;
    output::info("Sesión cerrada.");
    Ok(())
}

pub async fn whoami(ctx: &mut Context) -> Result<(), Box<dyn Error>> {
    let user = auth::whoami(ctx.gateway.as_ref(), &mut ctx.session).await?;
    output::user(&user);
    Ok(())
}
