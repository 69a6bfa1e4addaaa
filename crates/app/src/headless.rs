use std::path::{Path, PathBuf};
use std::process;

use eyeswap_core::{
    import_gltf_character, replace_eyes, write_scene_obj, AssetOrder, Preferences, Project,
    ReplaceReport, SelectionSession,
};
use eyeswap_scene::{ObjectId, Scene};

#[derive(Debug, Default, PartialEq)]
struct HeadlessArgs {
    scene_path: Option<PathBuf>,
    skeleton: Option<String>,
    mesh: Option<String>,
    assets: Option<String>,
    threshold: Option<f32>,
    order: Option<AssetOrder>,
    save_path: Option<PathBuf>,
    export_path: Option<PathBuf>,
    print: bool,
}

pub fn maybe_run_headless(args: &[String]) -> Result<bool, String> {
    if !args
        .iter()
        .any(|arg| arg == "--headless" || arg == "-headless")
    {
        return Ok(false);
    }

    let parsed = parse_headless_args(args)?;
    let report = run_headless(&parsed, Preferences::load_or_default())?;
    tracing::info!("headless: {}", report.summary());
    tracing::info!("headless: completed");
    Ok(true)
}

fn parse_headless_args(args: &[String]) -> Result<HeadlessArgs, String> {
    let mut parsed = HeadlessArgs::default();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{flag} requires a value"))
        };
        match arg.as_str() {
            "--headless" | "-headless" => {}
            "--scene" => parsed.scene_path = Some(PathBuf::from(value("--scene")?)),
            "--skeleton" => parsed.skeleton = Some(value("--skeleton")?),
            "--mesh" => parsed.mesh = Some(value("--mesh")?),
            "--assets" => parsed.assets = Some(value("--assets")?),
            "--threshold" => {
                let raw = value("--threshold")?;
                let threshold = raw
                    .parse::<f32>()
                    .map_err(|_| format!("invalid threshold '{raw}'"))?;
                if !(0.0..=1.0).contains(&threshold) {
                    return Err(format!("threshold '{raw}' must be between 0 and 1"));
                }
                parsed.threshold = Some(threshold);
            }
            "--order" => parsed.order = Some(parse_order(&value("--order")?)?),
            "--save" => parsed.save_path = Some(PathBuf::from(value("--save")?)),
            "--export" => parsed.export_path = Some(PathBuf::from(value("--export")?)),
            "--print" => parsed.print = true,
            "--help" | "-h" => {
                print_headless_help();
                process::exit(0);
            }
            other => return Err(format!("unknown argument '{other}'")),
        }
    }

    Ok(parsed)
}

fn parse_order(value: &str) -> Result<AssetOrder, String> {
    match value.to_ascii_lowercase().as_str() {
        "auto" => Ok(AssetOrder::Auto),
        "named" | "name" => Ok(AssetOrder::Named),
        "positional" | "order" => Ok(AssetOrder::Positional),
        _ => Err(format!("invalid order '{value}' (auto, named, positional)")),
    }
}

fn print_headless_help() {
    println!(
        "Headless mode options:\n  --headless | -headless\n  --scene <project.json|character.gltf>\n  --skeleton <name>\n  --mesh <name>\n  --assets <path>\n  --threshold <weight>\n  --order <auto|named|positional>\n  --save <project.json>\n  --export <scene.obj>\n  --print"
    );
}

fn run_headless(args: &HeadlessArgs, mut prefs: Preferences) -> Result<ReplaceReport, String> {
    let scene_path = args
        .scene_path
        .as_deref()
        .ok_or_else(|| "--scene is required".to_string())?;
    let mut scene = load_scene(scene_path)?;

    let skeleton = find_object(&scene, args.skeleton.as_deref(), "--skeleton")?;
    let mesh = find_object(&scene, args.mesh.as_deref(), "--mesh")?;
    let mut session = SelectionSession::new();
    scene.set_active(Some(skeleton));
    session
        .select_skeleton(&scene)
        .map_err(|err| err.to_string())?;
    scene.set_active(Some(mesh));
    session.select_mesh(&scene).map_err(|err| err.to_string())?;

    if let Some(assets) = &args.assets {
        prefs.eye_asset_path = assets.clone();
    }
    if let Some(threshold) = args.threshold {
        prefs.weight_threshold = threshold;
    }
    if let Some(order) = args.order {
        prefs.asset_order = order;
    }

    let report = replace_eyes(&mut scene, &session, &prefs).map_err(|err| err.to_string())?;
    let project = Project::from_scene(scene);

    if let Some(path) = &args.save_path {
        project.save(path).map_err(|err| err.to_string())?;
        tracing::info!("headless: saved project to {:?}", path);
    }
    if let Some(path) = &args.export_path {
        let count = write_scene_obj(path, &project.scene).map_err(|err| err.to_string())?;
        tracing::info!("headless: exported {} meshes to {:?}", count, path);
    }
    if args.print {
        let json = serde_json::to_string_pretty(&project).map_err(|err| err.to_string())?;
        println!("{json}");
    }
    Ok(report)
}

fn load_scene(path: &Path) -> Result<Scene, String> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match extension.as_str() {
        "json" => Project::load(path)
            .map(|project| project.scene)
            .map_err(|err| err.to_string()),
        "gltf" | "glb" => {
            let mut scene = Scene::new();
            import_gltf_character(path, &mut scene).map_err(|err| err.to_string())?;
            Ok(scene)
        }
        other => Err(format!("unsupported scene format '.{other}'")),
    }
}

fn find_object(scene: &Scene, name: Option<&str>, flag: &str) -> Result<ObjectId, String> {
    let name = name.ok_or_else(|| format!("{flag} is required"))?;
    scene
        .find_by_name(name)
        .ok_or_else(|| format!("object '{name}' not found"))
}
