//! I/O 支持：JSON、RON 与 YAML 序列化接口。
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use ron::ser::PrettyConfig;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ron error: {0}")]
    Ron(#[from] ron::Error),
    #[error("ron parse error: {0}")]
    RonParse(#[from] ron::error::SpannedError),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 由文件扩展名决定的序列化格式，未知扩展名按 JSON 处理。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Ron,
    Yaml,
}

impl Format {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("ron") => Format::Ron,
            Some("yaml") | Some("yml") => Format::Yaml,
            _ => Format::Json,
        }
    }

    pub fn render<T: Serialize>(self, value: &T) -> Result<String, IoError> {
        match self {
            Format::Json => to_json_string(value),
            Format::Ron => to_ron_string(value),
            Format::Yaml => to_yaml_string(value),
        }
    }

    pub fn parse<T: DeserializeOwned>(self, s: &str) -> Result<T, IoError> {
        match self {
            Format::Json => from_json_str(s),
            Format::Ron => from_ron_str(s),
            Format::Yaml => from_yaml_str(s),
        }
    }
}

pub fn to_json_string<T>(value: &T) -> Result<String, IoError>
where
    T: Serialize,
{
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn from_json_str<T>(s: &str) -> Result<T, IoError>
where
    T: DeserializeOwned,
{
    Ok(serde_json::from_str(s)?)
}

pub fn to_ron_string<T>(value: &T) -> Result<String, IoError>
where
    T: Serialize,
{
    let mut pretty = PrettyConfig::default();
    pretty.new_line = "\n".into();
    Ok(ron::ser::to_string_pretty(value, pretty)?)
}

pub fn from_ron_str<T>(s: &str) -> Result<T, IoError>
where
    T: DeserializeOwned,
{
    Ok(ron::from_str(s)?)
}

pub fn to_yaml_string<T>(value: &T) -> Result<String, IoError>
where
    T: Serialize,
{
    Ok(serde_yaml::to_string(value)?)
}

pub fn from_yaml_str<T>(s: &str) -> Result<T, IoError>
where
    T: DeserializeOwned,
{
    Ok(serde_yaml::from_str(s)?)
}

/// 按扩展名读取文件。
pub fn read_file<P: AsRef<Path>, T: DeserializeOwned>(path: P) -> Result<T, IoError> {
    let mut file = File::open(path.as_ref())?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Format::from_path(path).parse(&content)
}

/// 按扩展名写入文件，必要时创建父目录。
pub fn write_file<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<(), IoError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let content = Format::from_path(path).render(value)?;
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
