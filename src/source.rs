//! 日志文件来源
//!
//! `ObjectStore` 抽象了按 (bucket, key) 读取与删除对象的能力。
//! 库内只提供本地文件系统实现，云端对象存储由调用方实现该 trait。

use crate::error::{AlbLogError, Result};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// 对象存储接口
pub trait ObjectStore {
    /// 读取对象全部内容；对象不存在时返回 `AlbLogError::NotFound`
    fn fetch(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    /// 删除对象
    fn delete(&self, bucket: &str, key: &str) -> Result<()>;
}

/// 以本地目录模拟的对象存储：对象路径为 `<root>/<bucket>/<key>`
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 解析对象路径，拒绝跳出 bucket 目录的 key
    pub fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf> {
        let escapes = |s: &str| {
            s.is_empty()
                || Path::new(s)
                    .components()
                    .any(|c| !matches!(c, Component::Normal(_)))
        };
        if escapes(bucket) || escapes(key) {
            return Err(AlbLogError::config(format!("非法的对象路径: {bucket}/{key}")));
        }
        Ok(self.root.join(bucket).join(key))
    }

    fn not_found(bucket: &str, key: &str) -> AlbLogError {
        AlbLogError::NotFound { bucket: bucket.to_string(), key: key.to_string() }
    }
}

impl ObjectStore for LocalObjectStore {
    fn fetch(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let path = self.object_path(bucket, key)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Self::not_found(bucket, key)),
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, bucket: &str, key: &str) -> Result<()> {
        let path = self.object_path(bucket, key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Self::not_found(bucket, key)),
            Err(e) => Err(e.into()),
        }
    }
}
