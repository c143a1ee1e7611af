use crate::prelude::*;

fn read_config() -> Settings {
    settings::read_settings(Some("src/tests/config.toml")).unwrap()
}

#[test]
fn read_mandatory_settings() {
    let settings = read_config();
    assert_eq!(settings.paths.data, "src/tests/data/theophylline.csv");
    assert_eq!(settings.columns.subject, "Subject_ID");
    assert_eq!(settings.config.std_policy, StdPolicy::Nan);
    assert!(!settings.output.write);
    assert!(!settings.log.stdout);
    assert_eq!(settings.log.file, None);
}

#[test]
fn read_chart_kinds() {
    let settings = read_config();
    assert_eq!(
        settings.config.charts,
        vec![
            ChartKind::Individual,
            ChartKind::MeanSemilog,
            ChartKind::Combined
        ]
    );
}

#[test]
fn missing_settings_file_is_an_error() {
    assert!(settings::read_settings(Some("src/tests/does_not_exist.toml")).is_err());
}

#[test]
fn theophylline_dataset() {
    let settings = read_config();
    let data = Dataset::from_path(&settings.paths.data, &settings.columns).unwrap();
    assert_eq!(data.len(), 132);
    assert_eq!(data.subject_ids().len(), 12);
    assert_eq!(
        data.times(),
        vec![0.0, 0.25, 0.5, 1.0, 2.0, 3.5, 5.0, 7.0, 9.0, 12.0, 24.0]
    );

    let result = process(data, settings).unwrap();
    assert_eq!(result.subjects().len(), 12);
    assert_eq!(result.aggregate().len(), 11);
    assert!(result.aggregate().points().iter().all(|p| p.n == 12));

    // Pre-dose samples are all zero
    let predose = result.aggregate().at(0.0).unwrap();
    assert_eq!((predose.mean, predose.std), (0.0, 0.0));

    let semilog = &result.charts()[1];
    assert_eq!(semilog.kind, ChartKind::MeanSemilog);
    assert_eq!(semilog.aggregate.as_ref().unwrap().len(), 10);
}
