// src/report/images.rs
// =============================================================================
// The image audit report: every <img> that is not inside a <picture>.
// =============================================================================

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageIssue {
    /// The element as serialized by the parser
    pub tag: String,
    pub src: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileImageIssues {
    pub file: String,
    pub images: Vec<ImageIssue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSummary {
    pub files_scanned: usize,
    pub files_with_issues: usize,
    pub total_issues: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAuditReport {
    pub timestamp: String,
    pub unconverted_images: Vec<FileImageIssues>,
    pub summary: ImageSummary,
}

pub fn print_image_summary(out: &mut impl Write, report: &ImageAuditReport) -> io::Result<()> {
    for entry in &report.unconverted_images {
        writeln!(out, "\n🖼️  {}", entry.file)?;
        for image in &entry.images {
            writeln!(out, "   - src: {}  alt: {}", image.src, image.alt)?;
        }
    }

    writeln!(out, "\n📊 Summary:")?;
    writeln!(out, "   📄 Files scanned: {}", report.summary.files_scanned)?;
    writeln!(out, "   ⚠️  Files with issues: {}", report.summary.files_with_issues)?;
    writeln!(out, "   🖼️  Unwrapped images: {}", report.summary.total_issues)?;

    if report.summary.total_issues > 0 {
        writeln!(
            out,
            "\n❌ Action required: Convert the listed <img> tags to the <picture> element for optimal performance."
        )?;
    } else {
        writeln!(out, "\n✅ Success! All images are using the responsive <picture> element.")?;
    }
    Ok(())
}
