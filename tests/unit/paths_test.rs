use instill_config::paths::{config_dir, data_dir, state_dir, Environment, ResolvedPaths};
use serial_test::serial;
use std::path::PathBuf;

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to save and restore the variables the resolver reads
    struct EnvGuard {
        saved: Vec<(&'static str, Option<String>)>,
    }

    impl EnvGuard {
        const VARS: [&'static str; 4] =
            ["INSTILL_CONFIG_DIR", "XDG_CONFIG_HOME", "XDG_STATE_HOME", "XDG_DATA_HOME"];

        fn new() -> Self {
            Self { saved: Self::VARS.iter().map(|name| (*name, std::env::var(name).ok())).collect() }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(value) => std::env::set_var(name, value),
                    None => std::env::remove_var(name),
                }
            }
        }
    }

    #[test]
    fn test_full_precedence_chain() {
        let mut env = Environment {
            config_dir_override: Some(PathBuf::from("/opt/instill-config")),
            xdg_config_home: Some(PathBuf::from("/xdg")),
            app_data: Some(PathBuf::from("C:/Users/me/AppData/Roaming")),
            home: PathBuf::from("/home/me"),
            windows: true,
            ..Environment::default()
        };

        assert_eq!(config_dir(&env), PathBuf::from("/opt/instill-config"));
        env.config_dir_override = None;
        assert_eq!(config_dir(&env), PathBuf::from("/xdg/instill"));
        env.xdg_config_home = None;
        assert_eq!(config_dir(&env), PathBuf::from("C:/Users/me/AppData/Roaming/Instill CLI"));
        env.app_data = None;
        assert_eq!(config_dir(&env), PathBuf::from("/home/me/.config/instill"));
    }

    #[test]
    fn test_resolve_computes_all_three() {
        let env = Environment {
            xdg_state_home: Some(PathBuf::from("/xdg/state")),
            ..Environment::with_home("/home/me")
        };
        let paths = ResolvedPaths::resolve(&env);

        assert_eq!(paths.config_dir, PathBuf::from("/home/me/.config/instill"));
        assert_eq!(paths.state_dir, PathBuf::from("/xdg/state/instill"));
        assert_eq!(paths.data_dir, PathBuf::from("/home/me/.local/share/instill"));
        assert_eq!(paths.state_file(), PathBuf::from("/xdg/state/instill/state.yml"));
        assert_eq!(paths.config_files().config, PathBuf::from("/home/me/.config/instill/config.yml"));
    }

    #[test]
    fn test_windows_variables_ignored_elsewhere() {
        let env = Environment {
            local_app_data: Some(PathBuf::from("/local")),
            windows: false,
            ..Environment::with_home("/home/me")
        };
        assert_eq!(state_dir(&env), PathBuf::from("/home/me/.local/instill/state"));
        assert_eq!(data_dir(&env), PathBuf::from("/home/me/.local/share/instill"));
    }

    #[test]
    #[serial]
    fn test_from_process_reads_variables() {
        let _guard = EnvGuard::new();
        std::env::set_var("INSTILL_CONFIG_DIR", "/tmp/instill-override");
        std::env::set_var("XDG_CONFIG_HOME", "/tmp/xdg-config");
        std::env::set_var("XDG_STATE_HOME", "/tmp/xdg-state");
        std::env::set_var("XDG_DATA_HOME", "/tmp/xdg-data");

        let env = Environment::from_process();
        assert_eq!(env.config_dir_override, Some(PathBuf::from("/tmp/instill-override")));
        assert_eq!(env.xdg_config_home, Some(PathBuf::from("/tmp/xdg-config")));
        assert_eq!(state_dir(&env), PathBuf::from("/tmp/xdg-state/instill"));
        assert_eq!(data_dir(&env), PathBuf::from("/tmp/xdg-data/instill"));
    }

    #[test]
    #[serial]
    fn test_from_process_treats_empty_as_unset() {
        let _guard = EnvGuard::new();
        std::env::set_var("INSTILL_CONFIG_DIR", "");
        std::env::set_var("XDG_CONFIG_HOME", "");

        let env = Environment::from_process();
        assert_eq!(env.config_dir_override, None);
        assert_eq!(env.xdg_config_home, None);
        assert!(config_dir(&env).ends_with(".config/instill"));
    }
}
