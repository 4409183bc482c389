//! CSV导出
//! 列固定为 URL / Score / Tech Stack，Score 使用归一化分数

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;
use tracing::info;

use crate::error::SigResult;
use crate::rule::ScanResult;

/// CSV表头
pub const CSV_HEADER: [&str; 3] = ["URL", "Score", "Tech Stack"];

/// 写入任意输出流
pub fn write_csv<W: Write>(output: W, results: &[ScanResult]) -> SigResult<()> {
    let mut writer = Writer::from_writer(output);
    writer.write_record(CSV_HEADER)?;

    for result in results {
        let score = result.normalized_score.to_string();
        let stack = result.tech_stack();
        writer.write_record([result.url.as_str(), score.as_str(), stack.as_str()])?;
    }

    writer.flush()?;
    Ok(())
}

/// 保存到文件，返回写入的数据行数
pub fn save_csv(path: impl AsRef<Path>, results: &[ScanResult]) -> SigResult<usize> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_csv(file, results)?;
    info!("CSV已保存：{}，行数={}", path.display(), results.len());
    Ok(results.len())
}
