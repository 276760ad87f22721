use wardrobe_core::config::{AppConfig, LoadOptions};
use wardrobe_db::{connect_with_config, migrations};

use crate::commands::{CommandFailure, CommandResult};

pub fn run(options: LoadOptions) -> CommandResult {
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => return CommandResult::from_failure("migrate", CommandFailure::config(error)),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::from_failure("migrate", CommandFailure::runtime(error));
        }
    };

    let result = runtime.block_on(async {
        let pool = connect_with_config(&config.database).await.map_err(|error| {
            CommandFailure::storage(format!("failed to connect to database: {error}"))
        })?;
        migrations::run_pending(&pool).await.map_err(CommandFailure::migration)?;
        pool.close().await;
        Ok::<(), CommandFailure>(())
    });

    match result {
        Ok(()) => CommandResult::success(
            "migrate",
            format!("applied pending migrations ({} bundled)", migrations::bundled_count()),
        ),
        Err(failure) => CommandResult::from_failure("migrate", failure),
    }
}
