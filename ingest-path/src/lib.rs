//! 导入工具的数据目录
//!
//! 可执行文件旁存在 `resources/data/ncaa_ingest.db` 时使用该目录（随程序分发的数据库），
//! 否则使用系统的应用数据目录。

use std::path::PathBuf;

pub const DB_DATA_DIR: &str = "data";
pub const DB_FILE_NAME: &str = "ncaa_ingest.db";
pub const RESOURCE_DIR: &str = "resources";

/// 可执行文件旁是否已有随程序分发的数据库
pub fn is_portable_mode() -> bool {
    bundled_resource_dir()
        .map(|dir| dir.join(DB_DATA_DIR).join(DB_FILE_NAME).is_file())
        .unwrap_or(false)
}

fn bundled_resource_dir() -> Result<PathBuf, String> {
    let exe = std::env::current_exe().map_err(|e| format!("无法定位可执行文件: {}", e))?;
    exe.parent()
        .map(|dir| dir.join(RESOURCE_DIR))
        .ok_or_else(|| format!("可执行文件没有上级目录: {}", exe.display()))
}

/// 数据根目录，数据库位于其下的 `data/`
pub fn get_base_data_dir() -> Result<PathBuf, String> {
    if is_portable_mode() {
        bundled_resource_dir()
    } else {
        app_data_dir()
    }
}

fn app_data_dir() -> Result<PathBuf, String> {
    directories::ProjectDirs::from("org", "ncaa-ingest", "ncaa-ingest")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| "当前环境没有可用的用户主目录".to_string())
}

pub fn get_db_path() -> Result<PathBuf, String> {
    Ok(get_base_data_dir()?.join(DB_DATA_DIR).join(DB_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_path_ends_with_data_file() {
        // 无 HOME 的环境下系统目录不可用
        if let Ok(path) = get_db_path() {
            assert!(path.ends_with(PathBuf::from(DB_DATA_DIR).join(DB_FILE_NAME)));
        }
    }

    #[test]
    fn falls_back_to_app_data_dir_without_bundled_db() {
        // 测试可执行文件旁没有 resources/data/ncaa_ingest.db
        assert!(!is_portable_mode());
        if let Ok(dir) = app_data_dir() {
            assert_eq!(get_base_data_dir().unwrap(), dir);
        }
    }
}
