//! Flat-file output of summarizer results.
//!
//! Record types serialize through serde with their camelCase JSON keys as
//! CSV headers. The correlation matrix and PCA projection carry nested
//! vectors and are written row by row.

use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use ibdseq_common::error::Result;

use crate::concordance::ConcordanceReport;
use crate::correlation::CorrelationMatrix;
use crate::pca::PcaProjection;

/// Write any flat serde record type as CSV, one row per item.
pub fn write_records<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Square matrix with model ids as both header row and first column.
pub fn write_correlation_matrix(path: &Path, matrix: &CorrelationMatrix) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    let mut header = vec![String::new()];
    header.extend(matrix.models.iter().cloned());
    writer.write_record(&header)?;

    for (model, row) in matrix.models.iter().zip(&matrix.values) {
        let mut record = vec![model.clone()];
        record.extend(row.iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// `PC1..PCk, model, condition, label` per point.
pub fn write_pca(path: &Path, projection: &PcaProjection) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    let mut header: Vec<String> = (1..=projection.num_components).map(|k| format!("PC{k}")).collect();
    header.extend(["model", "condition", "label"].map(String::from));
    writer.write_record(&header)?;

    for point in &projection.points {
        let mut record: Vec<String> = point.scores.iter().map(|v| v.to_string()).collect();
        record.push(point.model.clone());
        record.push(point.condition.clone());
        record.push(point.label.clone());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StampedReport<'a> {
    generated_at: String,
    #[serde(flatten)]
    report: &'a ConcordanceReport,
}

/// Pretty JSON with a `generatedAt` RFC 3339 timestamp.
pub fn write_concordance(path: &Path, report: &ConcordanceReport) -> Result<()> {
    let stamped = StampedReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        report,
    };
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &stamped)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::differential::PathwayRecord;
    use ibdseq_common::error::IbdSeqError;
    use crate::pca::PcaPoint;
    use crate::volcano::categorize_volcano_point;

    #[test]
    fn test_records_use_camel_case_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pathways.csv");
        let rows = vec![PathwayRecord::new("TNF signaling", 0.5, 40, 2.5).unwrap()];
        write_records(&path, &rows).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("pathway,pvalue,geneCount,enrichmentScore,padj"));
        assert_eq!(lines.next(), Some("TNF signaling,0.5,40,2.5,0.75"));
    }

    #[test]
    fn test_volcano_category_written_as_label() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("volcano.csv");
        let rows = vec![categorize_volcano_point("IL6", -1.5, 0.01).unwrap()];
        write_records(&path, &rows).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.lines().nth(1).unwrap().ends_with("true,Moderate Down"));
    }

    #[test]
    fn test_matrix_and_pca_layout() {
        let dir = tempfile::tempdir().unwrap();
        let matrix = CorrelationMatrix {
            models: vec!["a".into(), "b".into()],
            values: vec![vec![1.0, 0.5], vec![0.5, 1.0]],
        };
        let path = dir.path().join("corr.csv");
        write_correlation_matrix(&path, &matrix).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, ",a,b\na,1,0.5\nb,0.5,1\n");

        let projection = PcaProjection {
            num_components: 2,
            explained_variance: vec![2.0, 1.0],
            explained_variance_ratio: vec![0.6, 0.3],
            points: vec![PcaPoint {
                label: "acute_dss_DSS".into(),
                model: "acute_dss".into(),
                condition: "DSS".into(),
                scores: vec![1.5, -0.5],
            }],
        };
        let path = dir.path().join("pca.csv");
        write_pca(&path, &projection).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "PC1,PC2,model,condition,label\n1.5,-0.5,acute_dss,DSS,acute_dss_DSS\n");
    }

    #[test]
    fn test_unwritable_path_is_csv_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("pathways.csv");
        let rows = vec![PathwayRecord::new("TNF signaling", 0.5, 40, 2.5).unwrap()];
        assert!(matches!(write_records(&path, &rows), Err(IbdSeqError::Csv(_))));
    }
}
