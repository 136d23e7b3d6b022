// ==========================================
// Tracker 导入管道 - 命令行入口
// ==========================================
// 用法:
//   tracker-import <bundle.json> <preheat.json> [config.db] [persisted.json]
//
// - config.db: 含 config_kv 表的 SQLite 库；缺省或为 "-" 时使用默认设置
// - persisted.json: 通过校验的批次写出路径；缺省时只做试运行
// 导入报告以 JSON 输出到 stdout，日志输出到 stderr
// 环境变量 TRACKER_LOG_FORMAT=json 时日志为 JSON 行
// ==========================================

use anyhow::{bail, Context};
use std::sync::Arc;
use tracker_import::config::{ConfigManager, TrackerConfigReader, ValidationSettings};
use tracker_import::domain::TrackerBundle;
use tracker_import::importer::{
    InMemoryBundlePersister, JsonFileBundlePersister, TrackerBundlePersister, TrackerImporter,
    TrackerImporterImpl,
};
use tracker_import::preheat::{JsonFileSnapshotProvider, PreheatSnapshotProvider};
use tracker_import::preprocess::DuplicateRelationshipsPreProcessor;
use tracker_import::resolver::InMemoryCategoryService;
use tracker_import::validation::ValidationEngine;
use tracker_import::logging;

fn build_importer<C>(
    config: C,
    preheat_path: &str,
    persister: Box<dyn TrackerBundlePersister>,
    category_service: InMemoryCategoryService,
) -> Box<dyn TrackerImporter>
where
    C: TrackerConfigReader + 'static,
{
    Box::new(TrackerImporterImpl::new(
        config,
        Box::new(JsonFileSnapshotProvider::new(preheat_path)),
        persister,
        Arc::new(category_service),
        vec![Box::new(DuplicateRelationshipsPreProcessor)],
        ValidationEngine::default(),
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_from_env();

    let mut args = std::env::args().skip(1);
    let (bundle_path, preheat_path) = match (args.next(), args.next()) {
        (Some(b), Some(p)) => (b, p),
        _ => bail!("用法: tracker-import <bundle.json> <preheat.json> [config.db] [persisted.json]"),
    };
    let db_path = args.next().filter(|s| !s.trim().is_empty() && s != "-");
    let persisted_path = args.next().filter(|s| !s.trim().is_empty());

    tracing::info!("Tracker 导入管道 {}", tracker_import::VERSION);

    let raw = tokio::fs::read_to_string(&bundle_path)
        .await
        .with_context(|| format!("读取批次文件失败: {}", bundle_path))?;
    let bundle: TrackerBundle =
        serde_json::from_str(&raw).with_context(|| format!("批次 JSON 解析失败: {}", bundle_path))?;

    // 类别组合协作方由快照中的 AOC 构建
    let snapshot = JsonFileSnapshotProvider::new(&preheat_path)
        .fetch(&bundle)
        .await
        .context("读取预热快照失败")?;
    let category_service = InMemoryCategoryService::new(snapshot.category_option_combos);

    let persister: Box<dyn TrackerBundlePersister> = match &persisted_path {
        Some(path) => Box::new(JsonFileBundlePersister::new(path)),
        None => {
            tracing::info!("未指定输出路径，试运行不写出");
            Box::new(InMemoryBundlePersister::new())
        }
    };

    let importer = match &db_path {
        Some(path) => {
            let config = ConfigManager::new(path).context("打开配置库失败")?;
            build_importer(config, &preheat_path, persister, category_service)
        }
        None => build_importer(
            ValidationSettings::default(),
            &preheat_path,
            persister,
            category_service,
        ),
    };

    let report = importer.import(bundle).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
