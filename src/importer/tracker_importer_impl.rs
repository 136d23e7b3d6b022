// ==========================================
// Tracker 导入管道 - 导入器实现
// ==========================================
// 职责: 整合导入流程，从批次到落库
// 流程: 设置 → 预热 → 预处理 → 校验 → 原子模式过滤 → 落库 → 报告
// 红线: 预热完成前不运行任何校验钩子；设置在校验前一次读定
// ==========================================

use crate::config::{TrackerConfigReader, ValidationSettings};
use crate::domain::identifiers::TrackerIdentifierParams;
use crate::domain::import::{derive_status, PersistSummary, TrackerImportReport, TypeStats};
use crate::domain::tracker::TrackerBundle;
use crate::domain::types::{AtomicMode, TrackerType};
use crate::importer::error::{TrackerImportError, TrackerImportResult};
use crate::importer::tracker_importer_trait::{TrackerBundlePersister, TrackerImporter};
use crate::preheat::{PreheatSnapshotProvider, TrackerPreheat};
use crate::preprocess::BundlePreProcessor;
use crate::resolver::{AttributeOptionComboCache, BatchIndex, CategoryService};
use crate::validation::{remove_invalid_objects, ValidationContext, ValidationEngine, ValidationReport};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// TrackerImporterImpl - 导入器实现
// ==========================================
pub struct TrackerImporterImpl<C>
where
    C: TrackerConfigReader,
{
    // 配置读取器
    config: C,

    // 协作方
    snapshot_provider: Box<dyn PreheatSnapshotProvider>,
    persister: Box<dyn TrackerBundlePersister>,
    category_service: Arc<dyn CategoryService>,

    // 导入组件
    preprocessors: Vec<Box<dyn BundlePreProcessor>>,
    engine: ValidationEngine,
}

impl<C> TrackerImporterImpl<C>
where
    C: TrackerConfigReader,
{
    /// 创建新的 TrackerImporter 实例
    ///
    /// # 参数
    /// - config: 配置读取器
    /// - snapshot_provider: 预热快照提供方
    /// - persister: 落库协作方
    /// - category_service: 类别组合协作方
    /// - preprocessors: 批次预处理器（按顺序执行）
    /// - engine: 校验引擎
    pub fn new(
        config: C,
        snapshot_provider: Box<dyn PreheatSnapshotProvider>,
        persister: Box<dyn TrackerBundlePersister>,
        category_service: Arc<dyn CategoryService>,
        preprocessors: Vec<Box<dyn BundlePreProcessor>>,
        engine: ValidationEngine,
    ) -> Self {
        Self {
            config,
            snapshot_provider,
            persister,
            category_service,
            preprocessors,
            engine,
        }
    }

    /// 批次自带的标识方案优先，否则使用配置
    fn effective_identifiers(
        bundle: &TrackerBundle,
        settings: &ValidationSettings,
    ) -> TrackerIdentifierParams {
        if bundle.identifiers != TrackerIdentifierParams::default() {
            bundle.identifiers.clone()
        } else {
            settings.identifiers.clone()
        }
    }

    fn type_totals(bundle: &TrackerBundle) -> [(TrackerType, usize); 4] {
        [
            (TrackerType::TrackedEntity, bundle.tracked_entities.len()),
            (TrackerType::Enrollment, bundle.enrollments.len()),
            (TrackerType::Event, bundle.events.len()),
            (TrackerType::Relationship, bundle.relationships.len()),
        ]
    }

    /// 校验阶段（同步，不跨 await 持有上下文）
    fn validate(
        &self,
        bundle: &mut TrackerBundle,
        preheat: &TrackerPreheat,
        settings: &ValidationSettings,
        cancelled: &AtomicBool,
    ) -> ValidationReport {
        let batch = BatchIndex::from_bundle(bundle);
        let aoc_cache = AttributeOptionComboCache::new();
        let ctx = ValidationContext::new(
            preheat,
            &batch,
            settings,
            self.category_service.as_ref(),
            &aoc_cache,
        );
        self.engine.validate_cancellable(&ctx, bundle, cancelled)
    }
}

#[async_trait::async_trait]
impl<C> TrackerImporter for TrackerImporterImpl<C>
where
    C: TrackerConfigReader + Send + Sync,
{
    #[instrument(skip(self, bundle, cancelled), fields(import_id))]
    async fn import_with_cancel(
        &self,
        mut bundle: TrackerBundle,
        cancelled: Arc<AtomicBool>,
    ) -> TrackerImportResult<TrackerImportReport> {
        let start_time = Instant::now();
        let started_at = Utc::now();
        let import_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("import_id", import_id.as_str());

        info!(
            import_id = %import_id,
            objects = bundle.object_count(),
            "开始 Tracker 导入"
        );

        // === 步骤 1: 读取校验设置 ===
        debug!("步骤 1: 读取校验设置");
        let mut settings = ValidationSettings::load(&self.config).await.map_err(|e| {
            error!(error = %e, "校验设置读取失败");
            e
        })?;
        settings.identifiers = Self::effective_identifiers(&bundle, &settings);
        debug!(
            atomic_mode = %settings.atomic_mode,
            max_attribute_value_length = settings.max_attribute_value_length,
            "校验设置已读取"
        );

        // === 步骤 2: 预热 ===
        debug!("步骤 2: 预热");
        let snapshot = self.snapshot_provider.fetch(&bundle).await.map_err(|e| {
            error!(error = %e, "预热快照拉取失败");
            TrackerImportError::PreheatError(e.to_string())
        })?;
        let preheat = TrackerPreheat::from_snapshot(snapshot, settings.identifiers.clone());

        // === 步骤 3: 批次预处理 ===
        debug!("步骤 3: 批次预处理");
        let mut duplicates_removed = 0;
        for preprocessor in &self.preprocessors {
            if !preprocessor.enabled(&settings) {
                debug!(preprocessor = preprocessor.name(), "预处理器未启用，跳过");
                continue;
            }
            let removed = preprocessor.process(&mut bundle, &preheat);
            if removed > 0 {
                info!(preprocessor = preprocessor.name(), removed, "预处理移除对象");
            }
            duplicates_removed += removed;
        }

        // === 步骤 4: 校验 ===
        debug!("步骤 4: 校验");
        let totals = Self::type_totals(&bundle);
        let validation_report = self.validate(&mut bundle, &preheat, &settings, &cancelled);
        if cancelled.load(Ordering::Relaxed) {
            warn!(import_id = %import_id, "导入已取消，不落库");
            return Err(TrackerImportError::Cancelled);
        }

        // === 步骤 5: 原子模式过滤 ===
        debug!("步骤 5: 原子模式过滤");
        let to_persist = match settings.atomic_mode {
            AtomicMode::All if validation_report.has_errors() => {
                warn!(
                    errors = validation_report.error_count(),
                    "原子模式 ALL 且存在错误，整批不落库"
                );
                TrackerBundle {
                    identifiers: bundle.identifiers.clone(),
                    ..Default::default()
                }
            }
            _ => {
                let removed = remove_invalid_objects(&mut bundle, &validation_report);
                debug!(removed, "已剔除出错对象");
                bundle
            }
        };

        // === 步骤 6: 落库 ===
        debug!("步骤 6: 落库");
        let summary = if to_persist.is_empty() {
            PersistSummary::default()
        } else {
            self.persister.persist(&to_persist).await.map_err(|e| {
                error!(error = %e, "落库失败");
                e
            })?
        };

        // === 步骤 7: 生成报告 ===
        debug!("步骤 7: 生成报告");
        let stats: BTreeMap<TrackerType, TypeStats> = totals
            .into_iter()
            .filter(|(_, total)| *total > 0)
            .map(|(tracker_type, total)| {
                let created = summary.count(tracker_type).min(total);
                (
                    tracker_type,
                    TypeStats {
                        total,
                        created,
                        ignored: total - created,
                    },
                )
            })
            .collect();

        let report = TrackerImportReport {
            import_id,
            status: derive_status(validation_report.has_errors(), summary.total()),
            atomic_mode: settings.atomic_mode,
            stats,
            duplicates_removed,
            validation_report,
            started_at,
            elapsed_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            import_id = %report.import_id,
            status = ?report.status,
            created = report.total_created(),
            ignored = report.total_ignored(),
            errors = report.validation_report.error_count(),
            elapsed_ms = report.elapsed_ms,
            "Tracker 导入完成"
        );

        Ok(report)
    }

    async fn batch_import(
        &self,
        bundles: Vec<TrackerBundle>,
    ) -> TrackerImportResult<Vec<Result<TrackerImportReport, String>>> {
        use futures::future::join_all;

        info!(count = bundles.len(), "开始批量导入");

        let import_tasks = bundles.into_iter().enumerate().map(|(idx, bundle)| async move {
            match self.import(bundle).await {
                Ok(report) => Ok(report),
                Err(e) => {
                    error!(bundle_index = idx, error = %e, "批次导入失败");
                    Err(format!("批次 {} 导入失败: {}", idx, e))
                }
            }
        });

        let results = join_all(import_tasks).await;

        info!(
            total = results.len(),
            success = results.iter().filter(|r| r.is_ok()).count(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "批量导入完成"
        );

        Ok(results)
    }
}
