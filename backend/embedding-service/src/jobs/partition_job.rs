// ============================================
// Partition Job
// ============================================
//
// Loads the ratings file, cuts every user's history by the configured
// split ratios and writes one JSON-lines file per split.
//
// Usage:
//   embedding-service --mode partition
//   embedding-service --mode convert --source ua.test --target ua.test.jsonl

use crate::config::{DatasetConfig, ServiceConfig};
use crate::error::Result;
use crate::services::dataset::{
    convert_delimited_to_jsonl, load_records, partition, write_jsonl, DatasetStats,
    InteractionIndex,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct SplitOutput {
    pub name: String,
    pub path: PathBuf,
    pub records: usize,
}

#[derive(Debug, Clone)]
pub struct PartitionReport {
    pub stats: DatasetStats,
    pub splits: Vec<SplitOutput>,
}

pub fn run_partition_job(service: &ServiceConfig, dataset: &DatasetConfig) -> Result<PartitionReport> {
    let started = Instant::now();
    let data_path = dataset.data_path(service);

    let records = load_records(&data_path, dataset.delimiter, false)?;
    let index = InteractionIndex::build(&records);
    let stats = index.stats();
    stats.log(&data_path.display().to_string());

    // every split is cut before anything is written
    let parts = partition(index.users(), &dataset.split_ratios)?;

    fs::create_dir_all(&service.output_dir)?;

    // splits are staged next to their targets and only renamed into place
    // once every one of them has been written
    let mut staged: Vec<(PathBuf, SplitOutput)> = Vec::new();
    for (name, history) in parts.iter() {
        let path = service.output_dir.join(format!("{}.jsonl", name));
        let tmp = service.output_dir.join(format!(".{}.jsonl.tmp", name));
        let split_records = history.to_records();

        if let Err(e) = write_jsonl(&tmp, &split_records) {
            let _ = fs::remove_file(&tmp);
            discard_staged(&staged);
            return Err(e);
        }

        staged.push((
            tmp,
            SplitOutput {
                name: name.to_string(),
                path,
                records: split_records.len(),
            },
        ));
    }

    let mut splits = Vec::with_capacity(staged.len());
    for (idx, (tmp, split)) in staged.iter().enumerate() {
        if let Err(e) = fs::rename(tmp, &split.path) {
            discard_staged(&staged[idx..]);
            return Err(e.into());
        }
        splits.push(split.clone());
    }

    info!(
        "Partition job completed in {}ms: {} records into {} splits",
        started.elapsed().as_millis(),
        stats.count,
        splits.len()
    );

    Ok(PartitionReport { stats, splits })
}

fn discard_staged(staged: &[(PathBuf, SplitOutput)]) {
    for (tmp, _) in staged {
        if let Err(e) = fs::remove_file(tmp) {
            warn!("Failed to remove staged split {}: {}", tmp.display(), e);
        }
    }
}

pub fn run_convert_job(source: &Path, target: &Path, delimiter: u8) -> Result<usize> {
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    convert_delimited_to_jsonl(source, target, delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::services::dataset::{read_jsonl, SplitRatios};
    use crate::Record;
    use tempfile::tempdir;

    fn configs(dir: &Path, ratios: SplitRatios) -> (ServiceConfig, DatasetConfig) {
        (
            ServiceConfig {
                service_name: "embedding-service".to_string(),
                data_dir: dir.to_path_buf(),
                output_dir: dir.join("out"),
            },
            DatasetConfig {
                data_file: "ratings.tsv".to_string(),
                item_file: "u.item".to_string(),
                delimiter: b'\t',
                split_ratios: ratios,
                label_threshold: 3.0,
                recommend_threshold: 0.5,
            },
        )
    }

    #[test]
    fn test_partition_job_writes_each_split() {
        let dir = tempdir().unwrap();
        let rows: String = (0..10)
            .map(|i| format!("1\t{}\t{}\t0\n", 100 + i, 1 + i % 5))
            .chain((0..5).map(|i| format!("2\t{}\t4\t0\n", 200 + i)))
            .collect();
        fs::write(dir.path().join("ratings.tsv"), rows).unwrap();

        let (service, dataset) = configs(dir.path(), SplitRatios::train_test(0.8));
        let report = run_partition_job(&service, &dataset).unwrap();

        assert_eq!(report.stats.count, 15);
        assert_eq!(report.stats.unique_users, 2);
        assert_eq!(report.splits.len(), 2);
        assert_eq!(report.splits[0].name, "train");
        // user 1: 8 of 10, user 2: 4 of 5
        assert_eq!(report.splits[0].records, 12);
        assert_eq!(report.splits[1].records, 3);

        let test = read_jsonl(dir.path().join("out").join("test.jsonl")).unwrap();
        assert_eq!(
            test,
            vec![
                Record::new(1, 108, 4.0),
                Record::new(1, 109, 5.0),
                Record::new(2, 204, 4.0),
            ]
        );
    }

    #[test]
    fn test_invalid_ratios_write_nothing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("ratings.tsv"), "1\t1\t5\n").unwrap();

        let ratios = SplitRatios::new([("train", 0.6), ("test", 0.3)]);
        let (service, dataset) = configs(dir.path(), ratios);

        let err = run_partition_job(&service, &dataset).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidConfiguration(_)));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_failed_split_write_leaves_no_outputs() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("ratings.tsv"), "1\t1\t5\n1\t2\t4\n").unwrap();
        let (service, dataset) = configs(dir.path(), SplitRatios::train_test(0.5));

        // a directory where the second split's staging file would go
        let out = dir.path().join("out");
        fs::create_dir_all(out.join(".test.jsonl.tmp")).unwrap();

        assert!(run_partition_job(&service, &dataset).is_err());
        assert!(!out.join("train.jsonl").exists());
        assert!(!out.join(".train.jsonl.tmp").exists());
        assert!(!out.join("test.jsonl").exists());
    }

    #[test]
    fn test_partition_job_leaves_no_staging_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("ratings.tsv"), "1\t1\t5\n1\t2\t4\n").unwrap();
        let (service, dataset) = configs(dir.path(), SplitRatios::train_test(0.5));

        run_partition_job(&service, &dataset).unwrap();

        let mut names: Vec<String> = fs::read_dir(dir.path().join("out"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["test.jsonl", "train.jsonl"]);
    }

    #[test]
    fn test_convert_job() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("ua.test");
        fs::write(&source, "1,20,4\n2,30,1\n").unwrap();
        let target = dir.path().join("nested").join("ua.test.jsonl");

        assert_eq!(run_convert_job(&source, &target, b',').unwrap(), 2);
        assert_eq!(read_jsonl(&target).unwrap().len(), 2);
    }
}
