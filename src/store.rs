//! 译文单元库
//!
//! 每种语言对应一份XLIFF文档，第一次用到时才从 [`DocumentSource`] 加载。
//!
//! 锁的约定：
//! - `documents` 是按语言登记的缓存，登记后不再移除；
//! - 加载并登记一个新语言时持有 `load_lock`，同一语言不会被加载两次；
//! - 已登记语言的读取只需要缓存表的读锁，不会等待正在进行的加载。

// 标准库导入
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// 第三方crate导入
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

// 本地模块导入
use crate::error::Result;
use crate::reconciler::{reconcile_orphans, ReconcileReport};
use crate::restype::TEXT_RUN_RESTYPE;
use crate::xliff::{TransUnit, Unit, Variant, XliffDocument};
use crate::xliff_error;
use crate::xliff_io::{read_xliff, write_xliff};

/// 按语言提供XLIFF文档
pub trait DocumentSource: Send + Sync {
    /// 读取某种语言的文档，不存在时返回 `None`
    fn load(&self, language: &str) -> Result<Option<XliffDocument>>;

    /// 保存某种语言的文档
    fn save(&self, language: &str, doc: &XliffDocument) -> Result<()>;
}

/// 目录中的 `<base>.<lang>.xlf` 文件
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
    base_name: String,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>, base_name: &str) -> Self {
        Self {
            dir: dir.into(),
            base_name: base_name.to_string(),
        }
    }

    pub fn path_for(&self, language: &str) -> PathBuf {
        self.dir.join(format!("{}.{}.xlf", self.base_name, language))
    }
}

impl DocumentSource for DirectorySource {
    fn load(&self, language: &str) -> Result<Option<XliffDocument>> {
        let path = self.path_for(language);
        if !path.exists() {
            return Ok(None);
        }
        let content = read_file(&path)?;
        read_xliff(&content).map(Some)
    }

    fn save(&self, language: &str, doc: &XliffDocument) -> Result<()> {
        let path = self.path_for(language);
        let content = write_xliff(doc)?;
        fs::write(&path, content)
            .map_err(|e| xliff_error!(file_op, path.display(), "写入", e))
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| xliff_error!(file_op, path.display(), "读取", e))
}

/// 内存中的文档来源
#[derive(Debug, Default)]
pub struct MemorySource {
    documents: RwLock<HashMap<String, XliffDocument>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置一种语言的文档（链式）
    pub fn with_document(self, language: &str, doc: XliffDocument) -> Self {
        self.documents.write().insert(language.to_string(), doc);
        self
    }

    /// 已保存的文档副本
    pub fn saved(&self, language: &str) -> Option<XliffDocument> {
        self.documents.read().get(language).cloned()
    }
}

impl DocumentSource for MemorySource {
    fn load(&self, language: &str) -> Result<Option<XliffDocument>> {
        Ok(self.saved(language))
    }

    fn save(&self, language: &str, doc: &XliffDocument) -> Result<()> {
        self.documents
            .write()
            .insert(language.to_string(), doc.clone());
        Ok(())
    }
}

/// 已登记的语言文档
pub type SharedDocument = Arc<RwLock<XliffDocument>>;

/// 译文单元库
///
/// 默认语言的文档只有原文；其他语言的文档以默认语言为原文、以该语言为译文。
pub struct TranslationStore<S: DocumentSource> {
    source: S,
    default_language: String,
    documents: RwLock<HashMap<String, SharedDocument>>,
    load_lock: Mutex<()>,
}

impl<S: DocumentSource> TranslationStore<S> {
    pub fn new(source: S, default_language: &str) -> Self {
        Self {
            source,
            default_language: default_language.to_string(),
            documents: RwLock::new(HashMap::new()),
            load_lock: Mutex::new(()),
        }
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// 已登记的语言，按字母顺序
    pub fn loaded_languages(&self) -> Vec<String> {
        let mut languages: Vec<String> = self.documents.read().keys().cloned().collect();
        languages.sort();
        languages
    }

    /// 取得某种语言的文档，必要时加载；来源中没有时新建一份空文档
    pub fn document(&self, language: &str) -> Result<SharedDocument> {
        if let Some(doc) = self.cached(language) {
            return Ok(doc);
        }

        let _guard = self.load_lock.lock();
        // 等锁期间可能已被其他调用者登记
        if let Some(doc) = self.cached(language) {
            return Ok(doc);
        }
        self.load_and_register(language)
    }

    fn cached(&self, language: &str) -> Option<SharedDocument> {
        self.documents.read().get(language).map(Arc::clone)
    }

    /// 调用者必须持有 `load_lock`
    fn load_and_register(&self, language: &str) -> Result<SharedDocument> {
        let doc = match self.source.load(language)? {
            Some(doc) => {
                info!(
                    "已加载语言文档 {}: {} 个翻译单元",
                    language,
                    doc.trans_units().len()
                );
                doc
            }
            None => {
                info!("语言文档 {} 不存在，新建空文档", language);
                self.empty_document(language)?
            }
        };

        let shared = Arc::new(RwLock::new(doc));
        self.documents
            .write()
            .insert(language.to_string(), Arc::clone(&shared));
        Ok(shared)
    }

    /// 调用者必须持有 `load_lock`
    fn empty_document(&self, language: &str) -> Result<XliffDocument> {
        if language == self.default_language {
            return Ok(XliffDocument::new("runtime", &self.default_language));
        }
        let default = match self.cached(&self.default_language) {
            Some(doc) => doc,
            None => self.load_and_register(&self.default_language)?,
        };
        let default = default.read();
        let mut doc = XliffDocument::new(&default.original, &default.source_language);
        doc.target_language = Some(language.to_string());
        doc.hard_linebreak = default.hard_linebreak.clone();
        doc.ampersand = default.ampersand.clone();
        Ok(doc)
    }

    /// 查询某个单元在某种语言中的纯文本
    ///
    /// 默认语言返回原文，其他语言返回译文；没有译文时返回 `None`。
    pub fn lookup(&self, id: &str, language: &str) -> Result<Option<String>> {
        let doc = self.document(language)?;
        let doc = doc.read();
        let Some(unit) = doc.find(id) else {
            debug!("{} 中没有单元 {}", language, id);
            return Ok(None);
        };

        let variant = if language == self.default_language {
            Some(&unit.source)
        } else {
            unit.target.as_ref()
        };
        Ok(variant.map(|variant| expand_tokens(&doc, &variant.plain_text())))
    }

    /// 记录某个单元在某种语言中的文本
    ///
    /// 默认语言中缺少的单元作为动态单元新建；其他语言中缺少的单元从默认语言的单元复制。
    /// 记录后的单元都标记为未审核。
    pub fn record(&self, id: &str, language: &str, text: &str) -> Result<()> {
        if language == self.default_language {
            let doc = self.document(language)?;
            let mut doc = doc.write();
            let variant = Variant::text(language, &collapse_tokens(&doc, text));
            match doc.find_mut(id) {
                Some(unit) => {
                    unit.source = variant;
                    unit.approved = false;
                }
                None => {
                    debug!("新建动态单元 {}", id);
                    let mut unit = TransUnit::new(id, TEXT_RUN_RESTYPE, variant);
                    unit.dynamic = true;
                    doc.body.push(Unit::TransUnit(unit));
                }
            }
            return Ok(());
        }

        // 先取默认语言的单元，避免同时持有两份文档的锁
        let template = {
            let default = self.document(&self.default_language)?;
            let default = default.read();
            default.find(id).cloned()
        };

        let doc = self.document(language)?;
        let mut doc = doc.write();
        let variant = Variant::text(language, &collapse_tokens(&doc, text));
        match doc.find_mut(id) {
            Some(unit) => {
                unit.target = Some(variant);
                unit.approved = false;
            }
            None => {
                let mut unit = template.ok_or_else(|| {
                    xliff_error!(input_validation, id, "默认语言中没有这个翻译单元")
                })?;
                unit.target = Some(variant);
                unit.approved = false;
                unit.notes.clear();
                doc.body.push(Unit::TransUnit(unit));
            }
        }
        Ok(())
    }

    /// 用新提取的文档调和所有已登记语言中的孤儿单元
    pub fn reconcile(&self, fresh: &XliffDocument) -> Vec<(String, ReconcileReport)> {
        let mut reports = Vec::new();
        for language in self.loaded_languages() {
            let doc = match self.documents.read().get(&language) {
                Some(doc) => Arc::clone(doc),
                None => continue,
            };
            let report = reconcile_orphans(&mut doc.write(), fresh);
            info!(
                "{}: 改名 {}, 未匹配 {}, 动态 {}",
                language,
                report.renamed.len(),
                report.unmatched.len(),
                report.still_dynamic.len()
            );
            reports.push((language, report));
        }
        reports
    }

    /// 保存某种语言的文档
    pub fn persist(&self, language: &str) -> Result<()> {
        let doc = self.document(language)?;
        let doc = doc.read();
        self.source.save(language, &doc)
    }
}

/// 把文件声明的替换记号还原为换行与 `&`
fn expand_tokens(doc: &XliffDocument, text: &str) -> String {
    let mut text = text.to_string();
    if let Some(token) = doc.hard_linebreak.as_deref().filter(|t| !t.is_empty()) {
        text = text.replace(token, "\n");
    }
    if let Some(token) = doc.ampersand.as_deref().filter(|t| !t.is_empty()) {
        text = text.replace(token, "&");
    }
    text
}

fn collapse_tokens(doc: &XliffDocument, text: &str) -> String {
    let mut text = text.to_string();
    if let Some(token) = doc.ampersand.as_deref().filter(|t| !t.is_empty()) {
        text = text.replace('&', token);
    }
    if let Some(token) = doc.hard_linebreak.as_deref().filter(|t| !t.is_empty()) {
        text = text.replace('\n', token);
    }
    text
}
