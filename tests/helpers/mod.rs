// ==========================================
// 集成测试辅助模块
// ==========================================
// 职责: 预热快照场景、导入对象构建器、Mock 配置、临时配置库
// ==========================================

#![allow(dead_code)]

pub mod mock_config;
pub mod test_data_builder;

use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时配置数据库文件
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径非 UTF-8")?
        .to_string();
    Ok((temp_file, db_path))
}
