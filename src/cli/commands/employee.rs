use clap::Subcommand;

use crate::cli::{repository, utils, OutputFormat};
use crate::config::AppConfig;
use crate::database::models::Employee;
use crate::location::EmployeeDirectory;

#[derive(Subcommand)]
pub enum EmployeeCommands {
    #[command(about = "Map a login identity to an employee")]
    Add {
        #[arg(help = "Employee id, e.g. EMP-001")]
        name: String,
        #[arg(help = "Login identity")]
        user_id: String,
        #[arg(long, help = "Display name")]
        employee_name: Option<String>,
        #[arg(long, help = "Company")]
        company: Option<String>,
    },

    #[command(about = "Show the employee mapped to a login identity")]
    Show {
        #[arg(help = "Login identity")]
        user_id: String,
    },
}

pub async fn handle(config: &AppConfig, cmd: EmployeeCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let repository = repository(config).await?;

    match cmd {
        EmployeeCommands::Add { name, user_id, employee_name, company } => {
            let employee = Employee { name, user_id, employee_name, company };
            repository.upsert_employee(&employee).await?;
            utils::output_success(
                &output_format,
                &format!("Employee {} mapped to {}", employee.name, employee.user_id),
                Some(serde_json::to_value(&employee)?),
            )
        }
        EmployeeCommands::Show { user_id } => match repository.find_by_user(&user_id).await? {
            Some(employee) => utils::output_success(
                &output_format,
                &format!("Employee for {}", user_id),
                Some(serde_json::to_value(&employee)?),
            ),
            None => anyhow::bail!("Employee not found for {}", user_id),
        },
    }
}
