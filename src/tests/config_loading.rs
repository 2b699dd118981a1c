#[cfg(test)]
mod test {

    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    use crate::config::credential::SecretValue;
    use crate::config::loader;
    use crate::config::settings::LogFormat;

    const SAMPLE_CONFIG: &str = r#"
settings:
  server:
    host: 127.0.0.1
    port: "9090"
  metrics:
    is_enabled: true

credential:
  tenant_id: contoso
  client_id: client-123
  client_secret:
    from_env: GP_TEST_CLIENT_SECRET
  token_endpoint: https://login.microsoftonline.com/common/oauth2/v2.0/token

graph:
  base_url: https://graph.microsoft.com/v1.0
"#;

    #[tokio::test]
    #[serial]
    async fn loads_yaml_and_applies_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_CONFIG.as_bytes()).unwrap();

        let config = loader::run(file.path().to_str().unwrap()).await.unwrap();

        assert_eq!(config.settings.server.host, "127.0.0.1");
        assert_eq!(config.settings.server.port, "9090");
        assert!(config.settings.metrics.is_enabled);
        assert_eq!(config.settings.metrics.path, "/metrics");
        // omitted logging falls back to compact info
        let logging = config.settings.logging.unwrap();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, LogFormat::Compact);

        assert_eq!(config.credential.tenant_id, "contoso");
        assert_eq!(
            config.credential.token_endpoint,
            "https://login.microsoftonline.com/common/oauth2/v2.0/token"
        );
        // scope default kicks in when omitted
        assert_eq!(config.graph.scope, "https://graph.microsoft.com/.default");
    }

    #[tokio::test]
    #[serial]
    async fn secret_resolves_from_env() {
        std::env::set_var("GP_TEST_CLIENT_SECRET", "from-the-env");

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_CONFIG.as_bytes()).unwrap();

        let config = loader::run(file.path().to_str().unwrap()).await.unwrap();
        assert_eq!(
            config.credential.client_secret.resolve().unwrap(),
            "from-the-env"
        );

        std::env::remove_var("GP_TEST_CLIENT_SECRET");
        assert!(config.credential.client_secret.resolve().is_err());
    }

    #[tokio::test]
    #[serial]
    async fn env_placeholders_expand_with_defaults() {
        std::env::remove_var("GP_TEST_TENANT");
        let yaml = r#"
settings:
  server:
    host: 0.0.0.0
    port: "${GP_TEST_PORT:8080}"

credential:
  tenant_id: ${GP_TEST_TENANT:fallback-tenant}
  client_id: client-123
  client_secret:
    value: inline-secret
  token_endpoint: https://login.microsoftonline.com/common/oauth2/v2.0/token

graph:
  base_url: https://graph.microsoft.com/v1.0
"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let config = loader::run(file.path().to_str().unwrap()).await.unwrap();
        assert_eq!(config.settings.server.port, "8080");
        assert_eq!(config.credential.tenant_id, "fallback-tenant");
        assert!(matches!(
            config.credential.client_secret,
            SecretValue::Literal { .. }
        ));
    }

    #[tokio::test]
    #[serial]
    async fn missing_file_is_an_error() {
        let result = loader::run("/nonexistent/graph-proxy.yaml").await;
        assert!(result.is_err());
    }
}
