use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error(
        "Misaligned series: {returns} return observations against {reference} reference values"
    )]
    MisalignedSeries { returns: usize, reference: usize },
}
