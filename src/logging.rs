use chrono::Local;
use std::path::PathBuf;
use std::sync::Once;

static INIT: Once = Once::new();

const LEVEL_VAR: &str = "EMBOSS_LOG_LEVEL";
const DIR_VAR: &str = "EMBOSS_LOG_DIR";
const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: log::LevelFilter,
    /// `None` keeps logging on stdout only.
    pub dir: Option<PathBuf>,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::resolve(|key| std::env::var(key).ok())
    }

    fn resolve<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let level = lookup(LEVEL_VAR)
            .or_else(|| lookup("RUST_LOG"))
            .and_then(|value| value.parse::<log::LevelFilter>().ok())
            .unwrap_or(log::LevelFilter::Info);

        let dir = match lookup(DIR_VAR).as_deref() {
            Some("off") | Some("none") | Some("") => None,
            Some(path) => Some(PathBuf::from(path)),
            None => Some(PathBuf::from(DEFAULT_LOG_DIR)),
        };

        Self { level, dir }
    }
}

pub fn init_logging(app_name: &str) -> Result<(), String> {
    let mut init_result: Result<(), String> = Ok(());
    INIT.call_once(|| {
        init_result = install(app_name, &LogSettings::from_env());
    });
    init_result
}

fn install(app_name: &str, settings: &LogSettings) -> Result<(), String> {
    let mut dispatch = fern::Dispatch::new()
        .level(settings.level)
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} | {:<5} | {} | {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .chain(std::io::stdout());

    if let Some(dir) = &settings.dir {
        std::fs::create_dir_all(dir).map_err(|err| err.to_string())?;
        let file_path = dir.join(format!("{app_name}-{}.log", Local::now().format("%Y_%m_%d")));
        dispatch = dispatch.chain(fern::log_file(file_path).map_err(|err| err.to_string())?);
    }

    dispatch.apply().map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> LogSettings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LogSettings::resolve(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_info_with_log_dir() {
        let resolved = settings(&[]);
        assert_eq!(resolved.level, log::LevelFilter::Info);
        assert_eq!(resolved.dir, Some(PathBuf::from("logs")));
    }

    #[test]
    fn app_level_wins_over_rust_log() {
        let resolved = settings(&[("EMBOSS_LOG_LEVEL", "debug"), ("RUST_LOG", "error")]);
        assert_eq!(resolved.level, log::LevelFilter::Debug);
        let fallback = settings(&[("RUST_LOG", "warn")]);
        assert_eq!(fallback.level, log::LevelFilter::Warn);
        let garbage = settings(&[("EMBOSS_LOG_LEVEL", "loud")]);
        assert_eq!(garbage.level, log::LevelFilter::Info);
    }

    #[test]
    fn file_logging_can_be_disabled() {
        assert_eq!(settings(&[("EMBOSS_LOG_DIR", "off")]).dir, None);
        assert_eq!(settings(&[("EMBOSS_LOG_DIR", "")]).dir, None);
        assert_eq!(
            settings(&[("EMBOSS_LOG_DIR", "/tmp/emboss")]).dir,
            Some(PathBuf::from("/tmp/emboss"))
        );
    }
}
