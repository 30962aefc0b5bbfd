use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};

use crate::{
    error::Result,
    services::export_service::{ExportService, LedgerRow},
    utils::time::today,
    AppState,
};

/// Commission ledger of all placements as XLSX.
#[axum::debug_handler]
pub async fn export_commissions(State(state): State<AppState>) -> Result<impl IntoResponse> {
    state.data_store().await?;
    let today = today();
    let buffer = {
        let session = state.session.read().await;
        let rows: Vec<LedgerRow<'_>> = session
            .placements
            .iter()
            .map(|p| LedgerRow {
                placement: p,
                candidate_name: session.candidate_name(&p.candidate_id),
            })
            .collect();
        ExportService::generate_commission_xlsx(&rows, &session.settings, today)?
    };

    let filename = format!("commissions_{}.xlsx", today.format("%Y%m%d"));
    let disposition = format!("attachment; filename=\"{}\"", filename);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        buffer,
    ))
}
