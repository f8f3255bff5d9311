use crate::prelude::{println, *};
use crate::store::{Fixtures, Store};
use std::path::{Path, PathBuf};

#[derive(Debug, clap::Args, Clone)]
pub struct InitOptions {
    /// JSON file with `units` and `imports` to load after creating the schema
    #[arg(long, env = "DOCSITE_FIXTURES")]
    pub fixtures: Option<PathBuf>,
}

pub async fn run(options: InitOptions, global: crate::Global) -> Result<()> {
    let fixtures = match &options.fixtures {
        Some(path) => Some(read_fixtures(path)?),
        None => None,
    };

    let store = Store::open(&global.db)?;
    let loaded = store
        .run(move |store| {
            store.migrate()?;
            if let Some(fixtures) = &fixtures {
                store.seed(fixtures)?;
            }
            Ok(fixtures.map(|f| f.units.len()).unwrap_or(0))
        })
        .await?;

    if global.verbose {
        println!("Initialized {} ({} units loaded)", global.db.display(), loaded);
    }

    Ok(())
}

fn read_fixtures(path: &Path) -> Result<Fixtures> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| eyre!("Failed to read fixtures '{}': {}", path.display(), e))?;
    serde_json::from_str(&content)
        .wrap_err_with(|| f!("Invalid fixtures file '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_fixtures() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"units": [{{"path": "a.com/m", "module_path": "a.com/m", "version": "v1.0.0"}}],
                "imports": [{{"from": "b.com/x", "to": "a.com/m"}}]}}"#
        )
        .unwrap();

        let fixtures = read_fixtures(file.path()).unwrap();
        assert_eq!(fixtures.units[0].path, "a.com/m");
        assert!(fixtures.units[0].name.is_none());
        assert_eq!(fixtures.imports[0].from, "b.com/x");
    }

    #[test]
    fn test_read_fixtures_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(read_fixtures(file.path()).is_err());
    }

    #[tokio::test]
    async fn test_run_creates_and_seeds_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("docsite.db");
        let fixtures = dir.path().join("fixtures.json");
        std::fs::write(
            &fixtures,
            r#"{"units": [
                {"path": "a.com/m", "module_path": "a.com/m", "version": "v1.0.0", "name": "m"}
            ]}"#,
        )
        .unwrap();

        let global = crate::Global {
            db: db.clone(),
            config: None,
            verbose: false,
        };
        run(InitOptions { fixtures: Some(fixtures) }, global).await.unwrap();

        let store = Store::open(&db).unwrap();
        let unit = store.unit("a.com/m", None).unwrap().unwrap();
        assert_eq!(unit.version, "v1.0.0");
    }
}
