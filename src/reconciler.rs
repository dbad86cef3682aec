//! 孤儿单元调和与合并
//!
//! 源文档结构变化后，同一段文本的层级id可能改变。调和把旧id上的译文、注释迁移到新id；
//! 合并把新提取的单元集合并入已发布的文档，旧单元不会被静默丢弃。

// 标准库导入
use std::collections::{HashMap, HashSet};

// 第三方crate导入
use chrono::NaiveDate;
use tracing::{debug, info};

// 本地模块导入
use crate::xliff::{terminal_component, Note, TransUnit, Unit, XliffDocument};

/// 文本变化时记录旧原文的注释来源
pub const NOTE_FROM_PREVIOUS_TEXT: &str = "previous-text";
/// 合并状态注释的来源
pub const NOTE_FROM_MERGE: &str = "merge";
/// 动态单元在静态扫描中缺席
pub const STILL_DYNAMIC_NOTE: &str = "expected — still dynamic";
/// 静态扫描找不到且不是动态单元
pub const LIKELY_OBSOLETE_NOTE: &str =
    "likely obsolete — not found in static scan and not marked dynamic";

/// 调和结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    /// (旧id, 新id)
    pub renamed: Vec<(String, String)>,
    /// 没有继任者的动态单元，属于预期情况
    pub still_dynamic: Vec<String>,
    /// 没有继任者的静态单元
    pub unmatched: Vec<String>,
}

/// 合并结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeReport {
    pub renamed: Vec<(String, String)>,
    /// 新出现的单元
    pub new_units: Vec<String>,
    /// 原文发生变化的单元
    pub changed: Vec<String>,
    pub still_dynamic: Vec<String>,
    pub likely_obsolete: Vec<String>,
}

impl MergeReport {
    /// 是否没有任何需要译者关注的变化
    pub fn is_unchanged(&self) -> bool {
        self.renamed.is_empty()
            && self.new_units.is_empty()
            && self.changed.is_empty()
            && self.likely_obsolete.is_empty()
    }
}

/// 孤儿单元的快照，避免在改写旧文档时持有它的借用
struct Orphan {
    id: String,
    text: String,
    dynamic: bool,
}

/// 为 `old` 中在 `fresh` 里找不到的单元寻找继任者并改写id
///
/// 继任者需要同时满足：id末段相同、原文完全相同、`old` 中还没有以该id登记的单元。
/// 多个候选时按文档顺序取第一个。
pub fn reconcile_orphans(old: &mut XliffDocument, fresh: &XliffDocument) -> ReconcileReport {
    let fresh_units = fresh.trans_units();
    let fresh_ids: HashSet<&str> = fresh_units.iter().map(|unit| unit.id.as_str()).collect();

    let orphans: Vec<Orphan> = old
        .trans_units()
        .into_iter()
        .filter(|unit| !fresh_ids.contains(unit.id.as_str()))
        .map(|unit| Orphan {
            id: unit.id.clone(),
            text: unit.source_text(),
            dynamic: unit.dynamic,
        })
        .collect();
    let mut claimed: HashSet<String> = old
        .trans_units()
        .into_iter()
        .map(|unit| unit.id.clone())
        .collect();

    let mut report = ReconcileReport::default();
    for orphan in orphans {
        let terminal = terminal_component(&orphan.id);
        let candidates: Vec<&&TransUnit> = fresh_units
            .iter()
            .filter(|unit| {
                unit.terminal_id() == terminal
                    && !claimed.contains(&unit.id)
                    && unit.source_text() == orphan.text
            })
            .collect();

        match candidates.first() {
            Some(successor) => {
                if candidates.len() > 1 {
                    info!(
                        "孤儿单元 {} 有 {} 个候选，取文档顺序中的第一个 {}",
                        orphan.id,
                        candidates.len(),
                        successor.id
                    );
                }
                if let Some(unit) = old.find_mut(&orphan.id) {
                    unit.id = successor.id.clone();
                }
                claimed.remove(&orphan.id);
                claimed.insert(successor.id.clone());
                info!("单元改名: {} → {}", orphan.id, successor.id);
                report.renamed.push((orphan.id, successor.id.clone()));
            }
            None if orphan.dynamic => {
                debug!("动态单元 {} 不在静态扫描结果中", orphan.id);
                report.still_dynamic.push(orphan.id);
            }
            None => {
                info!("孤儿单元 {} 没有找到继任者", orphan.id);
                report.unmatched.push(orphan.id);
            }
        }
    }
    report
}

/// 把新提取的文档合并进已发布的文档
///
/// 先调和孤儿单元，再以 `fresh` 的结构为准：
/// - 只在 `fresh` 中的单元记为新单元；
/// - 两边都有且原文变化的单元保留旧注释与旧译文，追加带日期的旧原文注释，并取消审核；
/// - 只在 `old` 中的单元追加到body末尾，并附上状态注释。
pub fn merge(
    old: &mut XliffDocument,
    fresh: &XliffDocument,
    date: NaiveDate,
) -> (XliffDocument, MergeReport) {
    let reconciled = reconcile_orphans(old, fresh);
    let mut report = MergeReport {
        renamed: reconciled.renamed,
        ..Default::default()
    };

    let previous: HashMap<String, TransUnit> = old
        .trans_units()
        .into_iter()
        .map(|unit| (unit.id.clone(), unit.clone()))
        .collect();

    let mut merged = fresh.clone();
    if merged.target_language.is_none() {
        merged.target_language = old.target_language.clone();
    }
    if merged.hard_linebreak.is_none() {
        merged.hard_linebreak = old.hard_linebreak.clone();
    }
    if merged.ampersand.is_none() {
        merged.ampersand = old.ampersand.clone();
    }

    let mut present = HashSet::new();
    merged.for_each_trans_unit_mut(|unit| {
        present.insert(unit.id.clone());
        match previous.get(&unit.id) {
            None => report.new_units.push(unit.id.clone()),
            Some(prev) => {
                unit.target = prev.target.clone();
                unit.dynamic |= prev.dynamic;
                unit.notes = prev
                    .notes
                    .iter()
                    .filter(|note| note.from.as_deref() != Some(NOTE_FROM_MERGE))
                    .cloned()
                    .collect();

                let previous_text = prev.source_text();
                if previous_text == unit.source_text() {
                    unit.approved = prev.approved;
                } else {
                    unit.notes.push(Note::new(
                        NOTE_FROM_PREVIOUS_TEXT,
                        &format!("({}) {}", date.format("%Y-%m-%d"), previous_text),
                    ));
                    unit.approved = false;
                    report.changed.push(unit.id.clone());
                }
            }
        }
    });

    for unit in old.trans_units() {
        if present.contains(&unit.id) {
            continue;
        }
        let mut retained = unit.clone();
        retained
            .notes
            .retain(|note| note.from.as_deref() != Some(NOTE_FROM_MERGE));
        let status = if retained.dynamic {
            report.still_dynamic.push(retained.id.clone());
            STILL_DYNAMIC_NOTE
        } else {
            report.likely_obsolete.push(retained.id.clone());
            LIKELY_OBSOLETE_NOTE
        };
        retained.notes.push(Note::new(NOTE_FROM_MERGE, status));
        merged.body.push(Unit::TransUnit(retained));
    }

    info!(
        "合并完成: 改名 {}, 新增 {}, 变化 {}, 动态 {}, 可能废弃 {}",
        report.renamed.len(),
        report.new_units.len(),
        report.changed.len(),
        report.still_dynamic.len(),
        report.likely_obsolete.len()
    );
    (merged, report)
}
