use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result, bail};
use clap::Parser;
use mailmerge::{CompiledTemplate, Context, Engine, RenderRequest, RenderResult};
use serde_json::{Map, Value, json};
use walkdir::WalkDir;

const GREETING: &str = "Hi {{name}}, {{#if premium}}Thanks for being a premium user!{{else}}Check out our premium plan.{{/if}}";

/// Render mail merge templates against JSON data
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// JSON request body: {"template": "...", "data": {...}}
    #[arg(long, conflicts_with = "template_dir")]
    request: Option<PathBuf>,
    /// Render every `.hbs` file under this directory
    #[arg(long)]
    template_dir: Option<PathBuf>,
    /// JSON object used as data for `--template-dir`
    #[arg(long, requires = "template_dir")]
    data: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let engine = Engine::default();

    if let Some(path) = cli.request {
        let body = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let request: RenderRequest = serde_json::from_str(&body)?;
        print_result(&engine.render_request(request)?)?;
    } else if let Some(dir) = cli.template_dir {
        let data = match cli.data {
            Some(path) => read_data(&path)?,
            None => Map::new(),
        };
        for (name, result) in render_directory(&engine, &dir, &data)? {
            println!("== {name}");
            print_result(&result)?;
        }
    } else {
        print_result(&engine.render(GREETING, json!({"name": "Alice", "premium": true}))?)?;
    }
    Ok(())
}

fn read_data(path: &Path) -> Result<Map<String, Value>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    match serde_json::from_str(&text)? {
        Value::Object(data) => Ok(data),
        _ => bail!("{} must hold a JSON object", path.display()),
    }
}

/// Renders each `.hbs` file under `dir` in file name order
fn render_directory(engine: &Engine, dir: &Path, data: &Map<String, Value>) -> Result<Vec<(String, RenderResult)>> {
    let mut rendered = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || path.extension().is_none_or(|ext| ext != "hbs") {
            continue;
        }
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let template = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        log::info!("rendering {}", path.display());
        let compiled = engine
            .compile(&template)
            .with_context(|| format!("compiling {}", path.display()))?;
        let missing = missing_keys(&compiled, data);
        if !missing.is_empty() {
            log::warn!("{name}: no data for {}", missing.join(", "));
        }
        let result = engine
            .render(&template, data.clone())
            .with_context(|| format!("rendering {}", path.display()))?;
        rendered.push((name, result));
    }
    Ok(rendered)
}

/// Keys the template reads that `data` does not provide
fn missing_keys<'t>(compiled: &'t CompiledTemplate, data: &Map<String, Value>) -> Vec<&'t str> {
    let context = Context::from(data.clone());
    compiled
        .keys()
        .into_iter()
        .filter(|key| context.lookup(key).is_none())
        .collect()
}

fn print_result(result: &RenderResult) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundled() -> Vec<(String, RenderResult)> {
        let root = Path::new(env!("CARGO_MANIFEST_DIR"));
        let data = read_data(&root.join("data.json")).unwrap();
        render_directory(&Engine::default(), &root.join("templates"), &data).unwrap()
    }

    #[test]
    fn renders_bundled_templates_in_order() {
        let names: Vec<_> = bundled().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["receipt", "welcome"]);
    }

    #[test]
    fn welcome_drops_the_script_but_keeps_formatting() {
        let (_, welcome) = bundled().into_iter().find(|(name, _)| name == "welcome").unwrap();
        assert!(welcome.rich_text.contains("<div class=\"bio\">Likes <b>tea</b></div>"));
        assert!(!welcome.rich_text.contains("script"));
        assert!(welcome.plain_text.starts_with("Hi Alice, Check out our premium plan"));
        assert!(welcome.plain_text.ends_with("Likes tea"));
    }

    #[test]
    fn receipt_reads_nested_order_fields() {
        let (_, receipt) = bundled().into_iter().find(|(name, _)| name == "receipt").unwrap();
        assert_eq!(
            receipt.plain_text,
            "Order A-1001 for Alice Items: 3 Total: 42.5 Payment is still pending."
        );
    }

    #[test]
    fn reports_keys_missing_from_the_data() {
        let engine = Engine::default();
        let compiled = engine
            .compile("{{name}} {{#if order.paid}}{{order.id}}{{/if}}{{nickname}}")
            .unwrap();
        let data = json!({"name": "Alice", "order": {"id": "A-1"}});
        let Value::Object(data) = data else { unreachable!() };
        assert_eq!(missing_keys(&compiled, &data), vec!["nickname", "order.paid"]);
        assert_eq!(missing_keys(&compiled, &Map::new()).len(), 4);
    }

    #[test]
    fn non_object_data_is_rejected() {
        let dir = std::env::temp_dir().join(format!("mailmerge-example-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("list.json");
        fs::write(&path, "[1, 2]").unwrap();
        assert!(read_data(&path).is_err());
        fs::remove_dir_all(&dir).unwrap();
    }
}
