use crate::app::{read_password, AppContext};
use crate::cli::CredentialsArgs;
use crate::ui;

pub fn handle_register(ctx: &AppContext, args: &CredentialsArgs) -> anyhow::Result<()> {
    let password = read_password(true, ctx.interactive())?;
    let profile = ctx.registry()?.register(&args.user, &password)?;

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false, None);
        ui::print(
            &ui_ctx,
            &ui::receipt(&ui_ctx, "Profile created", &[("Profile", profile.as_str())]),
        );
        ui::print(&ui_ctx, &ui::hint(&ui_ctx, "Protect it with `aura pin set`."));
    }
    Ok(())
}

pub fn handle_login(ctx: &AppContext, args: &CredentialsArgs) -> anyhow::Result<()> {
    let password = read_password(false, ctx.interactive())?;
    let profile = ctx.registry()?.sign_in(&args.user, &password)?;

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false, None);
        ui::print(
            &ui_ctx,
            &ui::receipt(&ui_ctx, "Signed in", &[("Profile", profile.as_str())]),
        );
    }
    Ok(())
}

pub fn handle_logout(ctx: &AppContext) -> anyhow::Result<()> {
    let registry = ctx.registry()?;
    let previous = registry.current()?;
    registry.sign_out()?;

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false, None);
        let message = match previous {
            Some(profile) => format!("Signed out of {}", profile),
            None => "Nobody was signed in".to_string(),
        };
        ui::print(&ui_ctx, &ui::badge(&ui_ctx, ui::Badge::Ok, &message));
    }
    Ok(())
}
