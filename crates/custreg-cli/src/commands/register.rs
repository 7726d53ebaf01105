use anyhow::Result;
use clap::Args;
use colored::Colorize;
use custreg_application::SubmitOutcome;
use custreg_core::customer::CustomerForm;

use super::Context;

#[derive(Args, Debug, Default)]
pub struct RegisterArgs {
    /// Full name (required)
    #[arg(long, default_value = "")]
    pub name: String,
    /// Email address (required)
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub company: String,
    #[arg(long, default_value = "")]
    pub designation: String,
    /// Full LinkedIn profile URL
    #[arg(long, default_value = "")]
    pub linkedin_url: String,
    /// Instagram handle, with or without the leading @
    #[arg(long, default_value = "")]
    pub instagram_id: String,
}

impl RegisterArgs {
    pub fn into_form(self) -> CustomerForm {
        CustomerForm {
            name: self.name,
            email: self.email,
            phone: self.phone,
            company: self.company,
            designation: self.designation,
            linkedin_url: self.linkedin_url,
            instagram_id: self.instagram_id,
        }
    }
}

pub async fn run(ctx: &Context, args: RegisterArgs) -> Result<()> {
    let app = ctx.bootstrap()?;
    for (field, value) in args.into_form().entries() {
        app.registration.set_field(field, value);
    }

    match app.registration.submit().await {
        SubmitOutcome::Registered { notification, .. } => {
            println!(
                "{}",
                format!("{}: {}", notification.title, notification.description).bright_green()
            );
            Ok(())
        }
        SubmitOutcome::Invalid(errors) => {
            for (field, message) in errors.iter() {
                eprintln!("{}", format!("  {}: {}", field.label(), message).red());
            }
            anyhow::bail!("{} field(s) need attention", errors.len())
        }
        SubmitOutcome::Failed(notification) => {
            anyhow::bail!("{}: {}", notification.title, notification.description)
        }
        SubmitOutcome::Busy => anyhow::bail!("A submission is already in progress"),
    }
}
