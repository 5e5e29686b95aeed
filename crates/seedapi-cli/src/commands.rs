use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context};
use colored::Colorize;

use seedapi_cache::RegenerationCache;
use seedapi_gen::{build_generator, generate_all, Generator, GeneratorConfig, ModelId, TokenUsage};
use seedapi_server::{SeedServer, ServerConfig};
use seedapi_types::{DescriptorFormat, DescriptorSet, GeneratedData};

use crate::cli::Cli;

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let data = resolve_data(&cli, hosted_generator).await?;
    let config = ServerConfig::default()
        .with_port(cli.port)
        .with_base_path(cli.base_path.clone());
    let server = SeedServer::new(config, data);
    for route in server.routes() {
        println!("  {:<6} {}", route.method.as_str().cyan(), route.path);
    }
    server.serve().await.context("server stopped")
}

fn hosted_generator(model: ModelId) -> anyhow::Result<Box<dyn Generator>> {
    let config = GeneratorConfig::from_env(model)?;
    Ok(build_generator(config)?)
}

/// Read and validate a descriptor file.
pub fn load_descriptors(path: &Path) -> anyhow::Result<DescriptorSet> {
    let format = DescriptorFormat::from_path(path)
        .with_context(|| format!("unsupported descriptor file {}", path.display()))?;
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read descriptor file {}", path.display()))?;
    let descriptors = DescriptorSet::parse(&text, format)
        .with_context(|| format!("invalid descriptor file {}", path.display()))?;
    tracing::debug!(resources = descriptors.len(), path = %path.display(), "loaded descriptors");
    Ok(descriptors)
}

/// The data to serve: an explicit file, the cached record, or a fresh
/// generation pass.
pub async fn resolve_data<F>(cli: &Cli, make_generator: F) -> anyhow::Result<GeneratedData>
where
    F: FnOnce(ModelId) -> anyhow::Result<Box<dyn Generator>>,
{
    if let Some(path) = &cli.serve {
        let path = std::env::current_dir()?.join(path);
        tracing::info!(path = %path.display(), "serving data file; generation skipped");
        return RegenerationCache::load_from(&path)
            .with_context(|| format!("failed to load {}", path.display()));
    }

    let descriptors = load_descriptors(&cli.descriptor_file)?;
    let cache = RegenerationCache::new(
        cli.cache_dir
            .clone()
            .unwrap_or_else(RegenerationCache::default_dir),
    );
    let fingerprint = RegenerationCache::fingerprint(&descriptors)?;

    if !cache.should_generate(&fingerprint, cli.regenerate)? {
        tracing::info!(fingerprint = fingerprint.short(), "descriptors unchanged; using cached data");
        return cache.load()?.ok_or_else(|| {
            anyhow!(
                "stale or missing cache in {}; rerun with --regenerate",
                cache.dir().display()
            )
        });
    }

    let generator = make_generator(cli.model_id)
        .with_context(|| format!("cannot generate with {}", cli.model_id))?;
    tracing::info!(model = %cli.model_id, resources = descriptors.len(), "generating data");
    let (data, usage) = generate_all(generator.as_ref(), &descriptors)
        .await
        .context("generation failed")?;
    cache
        .commit(&fingerprint, &data)
        .with_context(|| format!("failed to write cache in {}", cache.dir().display()))?;
    print_usage(&data, usage);
    Ok(data)
}

fn print_usage(data: &GeneratedData, usage: TokenUsage) {
    println!(
        "{} Generated {} resources ({} tokens: {} prompt, {} completion)",
        "✓".green().bold(),
        data.len().to_string().bold(),
        usage.total_tokens,
        usage.prompt_tokens,
        usage.completion_tokens
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use clap::Parser;
    use seedapi_gen::{decode_output, GenError, GenResult, Generation};
    use seedapi_types::{ResourceData, ResourceDescriptor};
    use serde_json::json;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    struct CannedGenerator {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Generator for CannedGenerator {
        async fn generate(&self, descriptor: &ResourceDescriptor) -> GenResult<Generation> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let output = if descriptor.cardinality.is_single() {
                json!({"name": "Ann"})
            } else {
                json!({"result": [{"id": 1}, {"id": 2}]})
            };
            Ok(Generation {
                data: decode_output(descriptor, output)?,
                usage: TokenUsage { prompt_tokens: 3, completion_tokens: 2, total_tokens: 5 },
            })
        }
    }

    struct Fixture {
        dir: TempDir,
        calls: Arc<AtomicUsize>,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let descriptors = json!({
                "users": {"shape": {"type": "object", "properties": {"id": {"type": "number"}}}},
                "me": {"single": true, "shape": {"type": "object"}}
            });
            fs::write(dir.path().join("api.json"), descriptors.to_string()).unwrap();
            Self { dir, calls: Arc::new(AtomicUsize::new(0)) }
        }

        fn cli(&self, extra: &[&str]) -> Cli {
            let file = self.dir.path().join("api.json");
            let cache = self.dir.path().join("cache");
            let mut args = vec![
                "seedapi".to_string(),
                "--cache-dir".to_string(),
                cache.display().to_string(),
            ];
            args.extend(extra.iter().map(|s| s.to_string()));
            args.push(file.display().to_string());
            Cli::try_parse_from(args).unwrap()
        }

        async fn resolve(&self, extra: &[&str]) -> anyhow::Result<GeneratedData> {
            let calls = self.calls.clone();
            resolve_data(&self.cli(extra), move |_| {
                Ok(Box::new(CannedGenerator { calls }) as Box<dyn Generator>)
            })
            .await
        }
    }

    #[tokio::test]
    async fn generates_once_then_uses_cache() {
        let fx = Fixture::new();

        let first = fx.resolve(&[]).await.unwrap();
        assert_eq!(fx.calls.load(Ordering::SeqCst), 2);
        assert!(matches!(first.get("me"), Some(ResourceData::Single(_))));
        assert!(fx.dir.path().join("cache").join(RegenerationCache::DATA_FILE).exists());

        let second = fx.resolve(&[]).await.unwrap();
        assert_eq!(second, first);
        assert_eq!(fx.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn regenerate_flag_forces_generation() {
        let fx = Fixture::new();
        fx.resolve(&[]).await.unwrap();
        fx.resolve(&["--regenerate"]).await.unwrap();
        assert_eq!(fx.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn generator_setup_failure_aborts() {
        let fx = Fixture::new();
        let err = resolve_data(&fx.cli(&[]), |_| {
            Err(GenError::MissingCredential("OPENAI_API_KEY").into())
        })
        .await
        .unwrap_err();
        assert!(format!("{err:#}").contains("OPENAI_API_KEY"));
        assert!(!fx.dir.path().join("cache").join(RegenerationCache::DATA_FILE).exists());
    }

    #[tokio::test]
    async fn serve_flag_skips_generation() {
        let fx = Fixture::new();
        let data_file = fx.dir.path().join("data.json");
        fs::write(&data_file, json!({"posts": [{"id": "a"}]}).to_string()).unwrap();
        let path = data_file.display().to_string();

        let data = fx.resolve(&["--serve", &path]).await.unwrap();

        assert_eq!(fx.calls.load(Ordering::SeqCst), 0);
        assert!(matches!(data.get("posts"), Some(ResourceData::Collection(items)) if items.len() == 1));
    }

    #[tokio::test]
    async fn serve_flag_rejects_route_syntax_names() {
        let fx = Fixture::new();
        let data_file = fx.dir.path().join("data.json");
        fs::write(&data_file, json!({"*all": [], ":a": {"x": 1}}).to_string()).unwrap();
        let path = data_file.display().to_string();

        let err = fx.resolve(&["--serve", &path]).await.unwrap_err();
        assert!(format!("{err:#}").contains("invalid resource name"));
    }

    #[tokio::test]
    async fn serve_flag_with_missing_file_fails() {
        let fx = Fixture::new();
        let missing = fx.dir.path().join("nope.json").display().to_string();
        assert!(fx.resolve(&["--serve", &missing]).await.is_err());
    }

    #[test]
    fn load_descriptors_from_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("api.toml");
        fs::write(
            &path,
            "[profile]\nsingle = true\nprompt = \"One profile\"\n\n[profile.shape]\ntype = \"object\"\n",
        )
        .unwrap();
        let descriptors = load_descriptors(&path).unwrap();
        assert_eq!(descriptors.len(), 1);
        assert!(descriptors.get("profile").unwrap().cardinality.is_single());
    }

    #[test]
    fn bundled_demos_load() {
        let demos = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
        let blog = load_descriptors(&demos.join("blog.json")).unwrap();
        assert_eq!(blog.names().collect::<Vec<_>>(), vec!["me", "posts"]);
        let shop = load_descriptors(&demos.join("shop.toml")).unwrap();
        assert!(shop.get("settings").unwrap().cardinality.is_single());
        assert!(shop.get("products").unwrap().declares_id());
    }

    #[test]
    fn load_descriptors_rejects_unknown_extension() {
        let err = load_descriptors(&PathBuf::from("api.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("unsupported descriptor file"));
    }

    #[test]
    fn load_descriptors_reports_invalid_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("api.json");
        fs::write(&path, r#"{"users": {"single": true}}"#).unwrap();
        let err = load_descriptors(&path).unwrap_err();
        assert!(format!("{err:#}").contains("users"));
    }
}
