use clap::Subcommand;

use crate::cli::{repository, utils, OutputFormat};
use crate::config::AppConfig;
use crate::geo::{GeoPoint, Geofence};
use crate::location::GeofenceStore;

#[derive(Subcommand)]
pub enum GeofenceCommands {
    #[command(about = "Show the configured office geofence")]
    Show,

    #[command(about = "Replace the office geofence")]
    Set {
        #[arg(long, allow_hyphen_values = true, help = "Centre latitude (-90..90)")]
        latitude: f64,
        #[arg(long, allow_hyphen_values = true, help = "Centre longitude (-180..180)")]
        longitude: f64,
        #[arg(long, help = "Radius in kilometres (> 0)")]
        radius: f64,
    },

    #[command(about = "Distance of a point from the office and whether it is inside")]
    Check {
        #[arg(allow_hyphen_values = true, help = "Latitude")]
        latitude: f64,
        #[arg(allow_hyphen_values = true, help = "Longitude")]
        longitude: f64,
    },
}

pub async fn handle(config: &AppConfig, cmd: GeofenceCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let repository = repository(config).await?;

    match cmd {
        GeofenceCommands::Show => match repository.current().await? {
            Some(fence) => utils::output_fields(
                &output_format,
                &[
                    ("latitude", fence.center.latitude.to_string()),
                    ("longitude", fence.center.longitude.to_string()),
                    ("radius_km", fence.radius_km.to_string()),
                ],
            ),
            None => utils::output_success(&output_format, "No office geofence configured", None),
        },
        GeofenceCommands::Set { latitude, longitude, radius } => {
            let fence = Geofence::new(GeoPoint::new(longitude, latitude)?, radius)?;
            repository.replace(fence).await?;
            utils::output_success(&output_format, "Office geofence updated", None)
        }
        GeofenceCommands::Check { latitude, longitude } => {
            let point = GeoPoint::new(longitude, latitude)?;
            let Some(fence) = repository.current().await? else {
                return utils::output_success(&output_format, "No office geofence configured; every point is accepted", None);
            };
            utils::output_fields(
                &output_format,
                &[
                    ("point", point.to_string()),
                    ("distance_km", format!("{:.3}", fence.distance_km(&point))),
                    ("radius_km", fence.radius_km.to_string()),
                    ("inside", fence.contains(&point).to_string()),
                ],
            )
        }
    }
}
