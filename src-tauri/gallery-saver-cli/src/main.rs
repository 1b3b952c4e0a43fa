//! Gallery Saver CLI
//!
//! 在桌面上用本地媒体库驱动导入流程，便于调试：
//! - `import`：导入单个文件，输出 `true` / `false`
//! - `list`：列出媒体库中的图片记录
//! - `call`：模拟一次 method channel 调用，输出 JSON 响应

use clap::{Args, Parser, Subcommand};
use gallery_saver_core::{
    channel::{FILE_PATH_ARG, SAVE_IMAGE_TO_GALLERY},
    handle_method_call, logging, FixedPlatform, GallerySaverConfig, GalleryImporter, LocalMediaStore,
    MediaStore, MethodCall,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "gallery-saver")]
#[command(version)]
#[command(about = "把图片保存到本地共享图库（调试工具）", long_about = None)]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct StoreArgs {
    /// 本地媒体库根目录（默认取配置或用户主目录）
    #[arg(long = "media-root", global = true)]
    media_root: Option<PathBuf>,

    /// 模拟的宿主 API level（< 29 走旧版路径）
    #[arg(long = "api-level", global = true)]
    api_level: Option<u32>,

    /// JSON 配置文件（字段同 tauri.conf.json 的 plugins.gallery-saver）
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 导入单个图片文件
    Import {
        /// 源文件路径
        path: PathBuf,
    },
    /// 列出媒体库中的图片
    List {
        /// 同时列出 Pending 记录
        #[arg(long = "all", default_value_t = false)]
        all: bool,
    },
    /// 发送一次 method channel 调用
    Call {
        /// 方法名（默认 saveImageToGallery）
        #[arg(default_value = SAVE_IMAGE_TO_GALLERY)]
        method: String,

        /// filePath 参数；省略时参数为空
        #[arg(long = "file-path")]
        file_path: Option<String>,
    },
}

fn build_importer(args: &StoreArgs) -> Result<GalleryImporter, String> {
    let mut config = match &args.config {
        Some(path) => GallerySaverConfig::load(path).map_err(|e| format!("Failed to load config: {}", e))?,
        None => GallerySaverConfig::default(),
    };
    if let Some(root) = &args.media_root {
        config.media_root = Some(root.clone());
    }
    if args.api_level.is_some() {
        config.api_level = args.api_level;
    }

    let root = config.resolve_media_root();
    let store = LocalMediaStore::open_with_index(&root, config.resolve_index_dir())
        .map_err(|e| format!("Failed to open media store at {}: {}", root.display(), e))?;
    Ok(GalleryImporter::new(
        Arc::new(store),
        Arc::new(FixedPlatform::default()),
        config,
    ))
}

fn run(cli: Cli) -> Result<bool, String> {
    let importer = build_importer(&cli.store)?;
    match cli.command {
        Commands::Import { path } => {
            let ok = importer.import_image(&path.to_string_lossy());
            println!("{}", ok);
            Ok(ok)
        }
        Commands::List { all } => {
            let records = importer.store().list_images().map_err(|e| e.to_string())?;
            for r in records.iter().filter(|r| all || r.is_visible()) {
                let location = r
                    .data_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                println!("{}\t{}\t{}\t{:?}\t{}", r.handle, r.display_name, r.mime_type, r.visibility, location);
            }
            Ok(true)
        }
        Commands::Call { method, file_path } => {
            let mut call = MethodCall::new(method);
            if let Some(p) = file_path {
                call = call.with_argument(FILE_PATH_ARG, p);
            }
            let resp = handle_method_call(&importer, &call);
            let json = serde_json::to_string_pretty(&resp).map_err(|e| e.to_string())?;
            println!("{}", json);
            Ok(true)
        }
    }
}

fn main() -> ExitCode {
    logging::init("info");
    let cli = Cli::parse();
    tracing::debug!(?cli, "gallery-saver cli");

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_import_with_global_flags() {
        let cli = Cli::parse_from([
            "gallery-saver",
            "import",
            "/tmp/photo.png",
            "--media-root",
            "/tmp/media",
            "--api-level",
            "28",
        ]);
        assert_eq!(cli.store.api_level, Some(28));
        assert_eq!(cli.store.media_root, Some(PathBuf::from("/tmp/media")));
        assert!(matches!(cli.command, Commands::Import { ref path } if path == &PathBuf::from("/tmp/photo.png")));
    }

    #[test]
    fn call_defaults_to_save_method() {
        let cli = Cli::parse_from(["gallery-saver", "call"]);
        match cli.command {
            Commands::Call { method, file_path } => {
                assert_eq!(method, SAVE_IMAGE_TO_GALLERY);
                assert!(file_path.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn import_reports_false_for_missing_file() {
        let media = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from([
            "gallery-saver",
            "--media-root",
            media.path().to_str().unwrap(),
            "import",
            media.path().join("missing.png").to_str().unwrap(),
        ]);
        assert_eq!(run(cli), Ok(false));
    }
}
