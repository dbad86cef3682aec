use std::time::Duration;

use crate::xliff::{Inline, Unit, XliffDocument};

/// 转换统计结构
#[derive(Debug, Default, Clone)]
pub struct ConversionStats {
    pub file_read_time: Duration,
    pub conversion_time: Duration,
    pub file_write_time: Duration,
    pub input_size: usize,
    pub output_size: usize,
    pub files_processed: usize,
    pub groups: usize,
    pub trans_units: usize,
    pub inline_markers: usize,
    pub translated_units: usize,
}

impl ConversionStats {
    /// 累加一份XLIFF文档的单元计数
    pub fn count_document(&mut self, doc: &XliffDocument) {
        count_units(&doc.body, self);
    }

    /// 合并另一份统计（目录批量处理时使用）
    pub fn absorb(&mut self, other: &ConversionStats) {
        self.file_read_time += other.file_read_time;
        self.conversion_time += other.conversion_time;
        self.file_write_time += other.file_write_time;
        self.input_size += other.input_size;
        self.output_size += other.output_size;
        self.files_processed += other.files_processed;
        self.groups += other.groups;
        self.trans_units += other.trans_units;
        self.inline_markers += other.inline_markers;
        self.translated_units += other.translated_units;
    }
}

fn count_units(units: &[Unit], stats: &mut ConversionStats) {
    for unit in units {
        match unit {
            Unit::Group(group) => {
                stats.groups += 1;
                count_units(&group.children, stats);
            }
            Unit::TransUnit(unit) => {
                stats.trans_units += 1;
                if unit.target.is_some() {
                    stats.translated_units += 1;
                }
                stats.inline_markers += count_markers(&unit.source.content);
            }
        }
    }
}

fn count_markers(content: &[Inline]) -> usize {
    content
        .iter()
        .map(|inline| match inline {
            Inline::Text(_) => 0,
            Inline::Span(span) => 1 + count_markers(&span.content),
            Inline::Marker(_) => 1,
            Inline::Placeholder(placeholder) => 1 + count_markers(&placeholder.content),
        })
        .sum()
}

/// 打印性能统计
pub fn print_performance_stats(stats: &ConversionStats, total_duration: Duration) {
    println!("\n📊 性能统计报告:");
    println!("═══════════════════════════════════════");

    println!("⏱️  时间分解:");
    println!("   文件读取: {}", format_duration(stats.file_read_time));
    println!("   转换执行: {}", format_duration(stats.conversion_time));
    println!("   文件写入: {}", format_duration(stats.file_write_time));
    println!("   总耗时: {}", format_duration(total_duration));

    println!("\n📏 文件统计:");
    println!("   处理文件: {} 个", stats.files_processed);
    println!(
        "   输入大小: {} 字节 ({:.1} KB)",
        stats.input_size,
        stats.input_size as f64 / 1024.0
    );
    println!(
        "   输出大小: {} 字节 ({:.1} KB)",
        stats.output_size,
        stats.output_size as f64 / 1024.0
    );
    if stats.input_size > 0 {
        println!(
            "   大小变化: {:.1}%",
            (stats.output_size as f64 / stats.input_size as f64 - 1.0) * 100.0
        );
    }

    println!("\n🔤 单元统计:");
    println!("   Group: {} 个", stats.groups);
    println!("   翻译单元: {} 个", stats.trans_units);
    println!("   已有译文: {} 个", stats.translated_units);
    println!("   内联标记: {} 个", stats.inline_markers);

    let seconds = total_duration.as_secs_f64();
    if seconds > 0.0 {
        println!("\n🚀 性能指标:");
        println!(
            "   处理速度: {:.1} KB/s",
            stats.input_size as f64 / 1024.0 / seconds
        );
    }
}

/// 格式化持续时间
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else {
        format!("{:.3}s", duration.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xliff::{Group, Marker, TransUnit, Variant};

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.500s");
    }

    #[test]
    fn test_count_document() {
        let mut unit = TransUnit::new(
            "genid-1",
            "x-html-p",
            Variant::new(
                "en",
                vec![
                    Inline::Text("a".to_string()),
                    Inline::Marker(Marker {
                        id: "genid-2".to_string(),
                        ctype: "lb".to_string(),
                        ..Default::default()
                    }),
                ],
            ),
        );
        unit.target = Some(Variant::text("fr", "b"));

        let mut doc = XliffDocument::new("a.html", "en");
        doc.body.push(Unit::Group(Group {
            restype: "x-html-body".to_string(),
            children: vec![Unit::TransUnit(unit)],
            ..Default::default()
        }));

        let mut stats = ConversionStats::default();
        stats.count_document(&doc);
        assert_eq!(stats.groups, 1);
        assert_eq!(stats.trans_units, 1);
        assert_eq!(stats.translated_units, 1);
        assert_eq!(stats.inline_markers, 1);

        let mut total = ConversionStats::default();
        total.absorb(&stats);
        total.absorb(&stats);
        assert_eq!(total.trans_units, 2);
    }
}
