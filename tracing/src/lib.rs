use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Init(#[from] tracing_subscriber::util::TryInitError),

    #[error("invalid RUST_LOG: {0}")]
    Filter(#[from] tracing_subscriber::filter::FromEnvError),
}

pub struct TracingBuilder {
    level: Level,
}

impl Default for TracingBuilder {
    fn default() -> Self {
        TracingBuilder { level: Level::INFO }
    }
}

impl TracingBuilder {
    /// Set the log level for the stderr layer. RUST_LOG still has a higher
    /// priority over this value.
    pub fn level(mut self, level: Level) -> TracingBuilder {
        self.level = level;
        self
    }

    /// Builds the [EnvFilter] used by [TracingBuilder::build], with the
    /// configured level as the default directive.
    fn env_filter(&self) -> Result<EnvFilter, Error> {
        Ok(EnvFilter::builder()
            .with_default_directive(self.level.into())
            .from_env()?)
    }

    /// This will setup tracing based on the configuration passed in.
    /// It will setup a compact stderr writer output layer and a EnvFilter
    /// based on the provided log level (RUST_LOG still has a higher priority
    /// over the configured value).
    pub fn build(self) -> Result<(), Error> {
        tracing_subscriber::registry()
            .with(self.env_filter()?)
            .with(
                tracing_subscriber::fmt::Layer::new()
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::TracingBuilder;
    use tracing::Level;

    #[test]
    fn default_level_is_info() {
        assert_eq!(Level::INFO, TracingBuilder::default().level);
    }

    #[test]
    fn level_overrides_default() {
        let builder = TracingBuilder::default().level(Level::TRACE);
        assert_eq!(Level::TRACE, builder.level);
    }

    #[test]
    fn second_init_fails() {
        // Only the first global subscriber can be installed per process.
        assert!(TracingBuilder::default().build().is_ok());
        assert!(TracingBuilder::default().build().is_err());
    }
}
