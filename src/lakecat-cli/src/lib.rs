use clap::{Args, Parser, Subcommand};
use common_error::{LakecatError, LakecatResult};
use lakecat_catalog::{impls::sql::URI, Catalog, Identifier, Namespace, SqlCatalog, Table};
use lakecat_io::Properties;
use serde_json::Value;
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const ENV_LAKECAT_LOG: &str = "LAKECAT_LOG";

#[derive(Parser, Debug)]
#[command(name = "lakecat", author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Connection string of the catalog database, e.g. sqlite:///tmp/catalog.db
    #[arg(long, env = "LAKECAT_URI")]
    pub uri: String,

    /// Name of the catalog whose rows are read
    #[arg(long = "catalog", env = "LAKECAT_CATALOG", default_value = "default")]
    pub name: String,

    /// Catalog property as key=value; may be repeated
    #[arg(short = 'p', long = "property", value_parser = parse_property)]
    pub properties: Vec<(String, String)>,
}

impl CatalogArgs {
    /// The catalog properties, with `--uri` taking precedence over a `uri` property.
    pub fn properties(&self) -> Properties {
        let mut properties = self.properties.iter().cloned().collect::<Properties>();
        properties.insert(URI.to_string(), self.uri.clone());
        properties
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the catalog tables if they do not exist
    Init,
    /// List the namespaces under a parent, or every namespace without one
    ListNamespaces { parent: Option<String> },
    /// List the tables of a namespace
    ListTables { namespace: String },
    /// Show the properties of a namespace
    NamespaceProperties { namespace: String },
    /// Resolve a table and show its metadata
    LoadTable { identifier: String },
}

/// Command result, printable as lines or as a single JSON document.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    lines: Vec<String>,
    json: Value,
}

impl Output {
    fn new(lines: Vec<String>, json: Value) -> Self {
        Self { lines, json }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn json(&self) -> &Value {
        &self.json
    }

    pub fn render(&self, json: bool) -> LakecatResult<String> {
        if json {
            Ok(serde_json::to_string_pretty(&self.json)?)
        } else {
            Ok(self.lines.join("\n"))
        }
    }
}

pub fn parse_property(input: &str) -> LakecatResult<(String, String)> {
    match input.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(LakecatError::ValueError(format!(
            "invalid property `{input}`, expected key=value"
        ))),
    }
}

/// Logs to stderr, filtered by `LAKECAT_LOG` and defaulting to warnings.
pub fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var(ENV_LAKECAT_LOG)
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

pub async fn run(cli: Cli) -> LakecatResult<()> {
    let catalog = SqlCatalog::from_properties(cli.catalog.name.clone(), cli.catalog.properties())
        .await?;
    let output = execute(&catalog, &cli.command).await?;
    let rendered = output.render(cli.json)?;
    if !rendered.is_empty() {
        println!("{rendered}");
    }
    Ok(())
}

pub async fn execute(catalog: &SqlCatalog, command: &Commands) -> LakecatResult<Output> {
    tracing::debug!("Running {command:?} against catalog {}", catalog.name());
    match command {
        Commands::Init => {
            catalog.store().create_catalog_tables().await?;
            Ok(Output::new(
                vec![format!("Initialized catalog {}", catalog.name())],
                serde_json::json!({ "catalog": catalog.name() }),
            ))
        }
        Commands::ListNamespaces { parent } => {
            let parent = match parent {
                Some(parent) => Namespace::parse(parent)?,
                None => Namespace::root(),
            };
            let namespaces = catalog
                .list_namespaces(&parent)
                .await?
                .iter()
                .map(Namespace::to_string)
                .collect::<Vec<_>>();
            let json = Value::from(namespaces.clone());
            Ok(Output::new(namespaces, json))
        }
        Commands::ListTables { namespace } => {
            let tables = catalog
                .list_tables(&Namespace::parse(namespace)?)
                .await?
                .iter()
                .map(Identifier::to_string)
                .collect::<Vec<_>>();
            let json = Value::from(tables.clone());
            Ok(Output::new(tables, json))
        }
        Commands::NamespaceProperties { namespace } => {
            let properties = catalog
                .load_namespace_properties(&Namespace::parse(namespace)?)
                .await?;
            let lines = properties
                .iter()
                .map(|(key, value)| format!("{key} = {value}"))
                .collect();
            Ok(Output::new(lines, serde_json::to_value(&properties)?))
        }
        Commands::LoadTable { identifier } => {
            let table = catalog.get_table(&Identifier::parse(identifier)?).await?;
            table_output(&table)
        }
    }
}

fn table_output(table: &Table) -> LakecatResult<Output> {
    let metadata = table.metadata();
    let mut lines = vec![
        format!("identifier: {}", table.identifier()),
        format!("metadata-location: {}", table.metadata_location()),
        format!("location: {}", table.location()),
        format!("format-version: {}", table.format_version()),
    ];
    if let Some(uuid) = metadata.table_uuid() {
        lines.push(format!("table-uuid: {uuid}"));
    }
    if let Some(last_updated_ms) = metadata.last_updated_ms() {
        lines.push(format!("last-updated-ms: {last_updated_ms}"));
    }
    lines.extend(
        table
            .properties()
            .iter()
            .map(|(key, value)| format!("property: {key} = {value}")),
    );

    let metadata = serde_json::to_value(&**metadata)?;
    let json = serde_json::json!({
        "identifier": table.identifier().to_string(),
        "metadata-location": table.metadata_location(),
        "metadata": metadata,
    });
    Ok(Output::new(lines, json))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("warehouse=/tmp/warehouse", ("warehouse", "/tmp/warehouse"))]
    #[case("io.region=us-east-1", ("io.region", "us-east-1"))]
    #[case("empty=", ("empty", ""))]
    #[case("query=a=b", ("query", "a=b"))]
    fn test_parse_property(#[case] input: &str, #[case] expected: (&str, &str)) {
        let (key, value) = parse_property(input).unwrap();
        assert_eq!((key.as_str(), value.as_str()), expected);
    }

    #[rstest]
    #[case("novalue")]
    #[case("=value")]
    #[case("")]
    fn test_parse_property_invalid(#[case] input: &str) {
        let err = parse_property(input).unwrap_err();
        assert!(matches!(err, LakecatError::ValueError(_)), "{err}");
    }

    #[test]
    fn test_parse_cli() {
        let cli = Cli::try_parse_from([
            "lakecat",
            "--uri",
            "sqlite:///tmp/catalog.db",
            "--catalog",
            "prod",
            "-p",
            "uri=ignored",
            "--property",
            "warehouse=/tmp/warehouse",
            "list-namespaces",
            "foo",
            "--json",
        ])
        .unwrap();

        assert!(cli.json);
        assert_eq!(cli.catalog.name, "prod");
        assert!(matches!(
            &cli.command,
            Commands::ListNamespaces { parent: Some(parent) } if parent == "foo"
        ));
        let properties = cli.catalog.properties();
        assert_eq!(
            properties.get(URI).map(String::as_str),
            Some("sqlite:///tmp/catalog.db")
        );
        assert_eq!(
            properties.get("warehouse").map(String::as_str),
            Some("/tmp/warehouse")
        );
    }

    #[test]
    fn test_parse_cli_rejects_bad_property() {
        let result = Cli::try_parse_from([
            "lakecat",
            "--uri",
            "sqlite:///tmp/catalog.db",
            "--property",
            "warehouse",
            "init",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_render() {
        let output = Output::new(
            vec!["foo".to_string(), "foo.bar".to_string()],
            serde_json::json!(["foo", "foo.bar"]),
        );
        assert_eq!(output.render(false).unwrap(), "foo\nfoo.bar");
        assert_eq!(
            serde_json::from_str::<Value>(&output.render(true).unwrap()).unwrap(),
            serde_json::json!(["foo", "foo.bar"])
        );
    }

    #[tokio::test]
    async fn test_execute_on_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let uri = format!("sqlite://{}?mode=rwc", dir.path().join("catalog.db").display());
        let properties = [(URI.to_string(), uri)].into_iter().collect();
        let catalog = SqlCatalog::from_properties("default", properties)
            .await
            .unwrap();

        let output = execute(&catalog, &Commands::Init).await.unwrap();
        assert_eq!(output.lines(), ["Initialized catalog default"]);

        let output = execute(&catalog, &Commands::ListNamespaces { parent: None })
            .await
            .unwrap();
        assert!(output.lines().is_empty());
        assert_eq!(output.json(), &serde_json::json!([]));

        let err = execute(
            &catalog,
            &Commands::NamespaceProperties {
                namespace: "missing".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("Namespace missing not found"), "{err}");

        let err = execute(
            &catalog,
            &Commands::LoadTable {
                identifier: "bare".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, LakecatError::CatalogError(_)), "{err}");
    }
}
