use crate::auth::{generate_jwt, Claims};
use crate::cli::{utils, OutputFormat};
use crate::config::AppConfig;

pub fn handle(config: &AppConfig, user: String, hours: Option<u64>, output_format: OutputFormat) -> anyhow::Result<()> {
    let hours = hours.unwrap_or(config.security.jwt_expiry_hours);
    let claims = Claims::new(user.clone(), hours);
    let token = generate_jwt(&claims, &config.security.jwt_secret)?;

    match output_format {
        OutputFormat::Text => println!("{}", token),
        OutputFormat::Json => utils::output_fields(
            &output_format,
            &[("user", user), ("token", token), ("expires_in_hours", hours.to_string())],
        )?,
    }
    Ok(())
}
