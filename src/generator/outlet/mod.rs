use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::generator::agents::ResearchReport;
use crate::generator::context::GeneratorContext;

pub const MARKDOWN_FILE: &str = "report.md";
pub const JSON_FILE: &str = "report.json";

/// 保存研究报告到配置的输出目录
pub async fn save(context: &GeneratorContext, report: &ResearchReport) -> Result<()> {
    let outlet = DiskOutlet::new(&context.config.output_path);
    outlet.save(report).await
}

#[allow(async_fn_in_trait)]
pub trait Outlet {
    async fn save(&self, report: &ResearchReport) -> Result<()>;
}

pub struct DiskOutlet {
    output_dir: PathBuf,
}

impl DiskOutlet {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
        }
    }
}

impl Outlet for DiskOutlet {
    async fn save(&self, report: &ResearchReport) -> Result<()> {
        println!("\n🖊️ 报告存储中...");
        fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("无法创建输出目录 {}", self.output_dir.display()))?;

        let markdown_path = self.output_dir.join(MARKDOWN_FILE);
        fs::write(&markdown_path, report.render_markdown())
            .await
            .with_context(|| format!("无法写入 {}", markdown_path.display()))?;
        println!("💾 已保存报告: {}", markdown_path.display());

        let json_path = self.output_dir.join(JSON_FILE);
        fs::write(&json_path, serde_json::to_string_pretty(report)?)
            .await
            .with_context(|| format!("无法写入 {}", json_path.display()))?;
        println!("💾 已保存报告: {}", json_path.display());

        Ok(())
    }
}
