use super::{aggregator, ArtifactSizes, BatchPipeline, RowSummary};
use crate::artifact::{Download, Glyph, QrRenderer};
use crate::models::{InstructionKind, NormalizedInstruction, RejectionReason, Row, SequentialRequestIds, UuidRequestIds};
use crate::rules::{classify, validate};
use crate::types::{QrType, RtpMode};
use crate::upstream::{GatewayError, PaymentGateway, UpstreamCall, UpstreamResponse};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::{tempdir, NamedTempFile};
use tokio::time::sleep;

type Responder = dyn Fn(&UpstreamCall) -> Result<UpstreamResponse, GatewayError> + Send + Sync;

/// Records every call and answers from a script. Calls whose payload carries an order id
/// starting with `SLOW` take longer than the rest.
struct ScriptedGateway {
    calls: Mutex<Vec<Value>>,
    responder: Box<Responder>
}

impl ScriptedGateway {
    fn new(responder: impl Fn(&UpstreamCall) -> Result<UpstreamResponse, GatewayError> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            responder: Box::new(responder)
        })
    }

    fn accepting() -> Arc<Self> {
        Self::new(|call| Ok(match call {
            UpstreamCall::Qr(request) => UpstreamResponse::from_text(201, &json!({ "data": { "code": format!("000201{}", request.order_id) } }).to_string()),
            _ => UpstreamResponse::from_text(200, r#"{"status":"ok"}"#)
        }))
    }

    fn calls(&self) -> Vec<Value> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn execute(&self, call: &UpstreamCall) -> Result<UpstreamResponse, GatewayError> {
        let payload = serde_json::to_value(call).unwrap_or(Value::Null);

        if payload["order_id"].as_str().is_some_and(|order_id| order_id.starts_with("SLOW")) {
            sleep(Duration::from_millis(100)).await;
        }

        if let Ok(mut calls) = self.calls.lock() {
            calls.push(payload);
        }

        (self.responder)(call)
    }
}

fn transport_error() -> GatewayError {
    match reqwest::Client::new().get("not a url").build() {
        Err(error) => GatewayError::Transport(error),
        Ok(_) => GatewayError::Config("expected an invalid url".to_string())
    }
}

fn create_rows(rows: &[&[&str]]) -> Vec<Row> {
    rows.iter()
        .enumerate()
        .map(|(index, fields)| Row::new(index + 1, fields.iter().map(|field| field.to_string()).collect()))
        .collect()
}

fn create_pipeline(gateway: Arc<ScriptedGateway>) -> BatchPipeline {
    BatchPipeline::new(gateway, Arc::new(SequentialRequestIds::new("gen")))
}

fn validated(fields: &[&str]) -> Result<(Row, NormalizedInstruction)> {
    let row = Row::new(1, fields.iter().map(|field| field.to_string()).collect());
    let instruction = validate(&classify(&row), &row, &SequentialRequestIds::new("gen"))?;
    Ok((row, instruction))
}

#[test]
fn test_aggregator_rejection_outcome() {
    let row = Row::new(4, vec!["ShopX".to_string(), "-5".to_string(), "DYNAMIC".to_string(), "ORD2".to_string()]);
    let outcome = aggregator::rejected(&row, InstructionKind::Qr(QrType::Dynamic), &RejectionReason::InvalidDynamicQrAmount);

    assert_eq!(outcome.row_number, 4);
    assert_eq!(outcome.kind_label(), "QR (DYNAMIC)");
    assert!(!outcome.success);
    assert!(!outcome.was_dispatched());
    assert_eq!(outcome.http_status, None);
    assert_eq!(outcome.message, "Bad row: invalid amount for DYNAMIC QR");
}

#[test]
fn test_aggregator_uses_reported_success_not_transport_alone() -> Result<()> {
    let (row, qr) = validated(&["ShopX", "0", "STATIC", "ORD1"])?;

    let without_code = aggregator::record(&row, &qr, Ok(UpstreamResponse::from_text(200, r#"{"data":{}}"#)));
    let with_code = aggregator::record(&row, &qr, Ok(UpstreamResponse::from_text(200, r#"{"code":"0002"}"#)));

    assert!(!without_code.success);
    assert_eq!(without_code.http_status, Some(200));
    assert_eq!(without_code.message, "QR STATIC Failed");
    assert!(with_code.success);
    assert_eq!(with_code.message, "QR STATIC Success");
    assert_eq!(with_code.artifact_text.as_deref(), Some("0002"));

    Ok(())
}

#[test]
fn test_aggregator_failure_messages() -> Result<()> {
    let (row, rtp) = validated(&["Acme", "250", "RTP_NOW", "IBAN", "PK01", "ORD3"])?;
    let (payout_row, payout) = validated(&["100", "PK02"])?;

    let with_message = aggregator::record(&row, &rtp, Ok(UpstreamResponse::from_text(422, r#"{"message":"debitor not found"}"#)));
    let malformed = aggregator::record(&row, &rtp, Ok(UpstreamResponse::from_text(500, "oops")));
    let transport = aggregator::record(&payout_row, &payout, Err(transport_error()));
    let accepted = aggregator::record(&payout_row, &payout, Ok(UpstreamResponse::from_text(200, "")));

    assert_eq!(with_message.message, "debitor not found");
    assert_eq!(with_message.http_status, Some(422));
    assert_eq!(malformed.message, "RTP Failed");
    assert_eq!(transport.message, "PAYOUT Failed");
    assert_eq!(transport.http_status, None);
    assert!(transport.was_dispatched());
    assert!(accepted.success);
    assert_eq!(accepted.message, "PAYOUT Success");
    assert_eq!(accepted.artifact_text, None);

    Ok(())
}

#[test]
fn test_row_summary_per_kind() {
    let payout = Row::new(1, vec!["100".to_string(), "PK02".to_string()]);
    let rtp = Row::new(2, vec!["Acme".to_string(), "250".to_string(), "RTP_NOW".to_string(), "IBAN".to_string()]);

    assert_eq!(RowSummary::describe(&payout, &InstructionKind::Payout), RowSummary {
        merchant: "—".to_string(),
        amount: "100".to_string(),
        party: "PK02".to_string()
    });
    assert_eq!(RowSummary::describe(&rtp, &InstructionKind::Rtp(RtpMode::Now)).party, "IBAN / —");
}

#[tokio::test]
async fn test_pipeline_dispatches_documented_examples() -> Result<()> {
    let gateway = ScriptedGateway::accepting();
    let pipeline = create_pipeline(gateway.clone());

    let report = pipeline.run_rows(create_rows(&[
        &["100.50", "PK00BANK0000000000000001"],
        &["ShopX", "0", "STATIC", "ORD1"],
        &["ShopX", "-5", "DYNAMIC", "ORD2"],
        &["Acme", "250", "RTP_NOW", "IBAN", "PK01BANK", "ORD3"],
    ])).await;

    let outcomes: Vec<_> = report.outcomes().collect();

    assert_eq!(report.len(), 4);
    assert_eq!(outcomes.iter().map(|outcome| outcome.kind_label()).collect::<Vec<_>>(), vec!["PAYOUT", "QR (STATIC)", "QR (DYNAMIC)", "RTP_NOW"]);
    assert_eq!(outcomes.iter().map(|outcome| outcome.success).collect::<Vec<_>>(), vec![true, true, false, true]);
    assert_eq!(outcomes[2].message, "Bad row: invalid amount for DYNAMIC QR");

    let calls = gateway.calls();

    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0], json!({ "request_id": "gen-1", "amount": "100.50", "creditor_iban": "PK00BANK0000000000000001", "type": "PAYOUT" }));
    assert_eq!(calls[1], json!({ "type": "STATIC", "aggregator_merchant_identifier": "ShopX", "order_id": "ORD1", "request_id": "gen-2" }));
    assert_eq!(calls[2]["debitor_iban"], "PK01BANK");
    assert_eq!(calls[2]["type"], "RTP_NOW");

    Ok(())
}

#[tokio::test]
async fn test_pipeline_rows_are_independent() -> Result<()> {
    let gateway = ScriptedGateway::new(|call| match call {
        UpstreamCall::Payout(_) => Err(transport_error()),
        UpstreamCall::Transfer(request) if request.order_id == "BAD" => {
            Ok(UpstreamResponse::from_text(400, r#"{"message":"order rejected"}"#))
        }
        _ => Ok(UpstreamResponse::from_text(200, "{}"))
    });
    let pipeline = create_pipeline(gateway.clone());

    let report = pipeline.run_rows(create_rows(&[
        &["Acme", "10", "RTP_NOW", "IBAN", "PK01", "OK1"],
        &["100", "PK02"],
        &["Acme", "10", "WIRE", "IBAN", "PK01", "ORD"],
        &["Acme", "10", "RTP_LATER", "IBAN", "PK01", "BAD"],
        &["Acme", "10", "RTP_LATER", "VAULT_TOKEN", "tok_1", "OK2"],
    ])).await;

    let outcomes: Vec<_> = report.outcomes().collect();

    assert_eq!(outcomes.iter().map(|outcome| outcome.row_number).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    assert_eq!(outcomes.iter().map(|outcome| outcome.success).collect::<Vec<_>>(), vec![true, false, false, false, true]);
    assert_eq!(outcomes[1].message, "PAYOUT Failed");
    assert_eq!(outcomes[2].message, "Bad row: unsupported instruction type (got: WIRE)");
    assert_eq!(outcomes[3].message, "order rejected");
    assert_eq!(outcomes[3].http_status, Some(400));
    assert_eq!(gateway.calls().len(), 4);
    assert_eq!(report.status_line(), "Done. 5 row(s) processed.");

    Ok(())
}

#[tokio::test]
async fn test_parallel_dispatch_keeps_row_order() -> Result<()> {
    let gateway = ScriptedGateway::accepting();
    let pipeline = create_pipeline(gateway.clone()).with_concurrency(4);

    let report = pipeline.run_rows(create_rows(&[
        &["Acme", "10", "RTP_NOW", "IBAN", "PK01", "SLOW-1"],
        &["Acme", "20", "RTP_NOW", "IBAN", "PK01", "FAST-2"],
        &["Acme", "30", "RTP_NOW", "IBAN", "PK01", "FAST-3"],
    ])).await;

    let calls = gateway.calls();

    assert_eq!(calls.last().map(|call| call["order_id"].clone()), Some(json!("SLOW-1")));
    assert_eq!(report.outcomes().map(|outcome| outcome.row_number).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(report.outcomes().map(|outcome| outcome.summary.amount.clone()).collect::<Vec<_>>(), vec!["10", "20", "30"]);

    Ok(())
}

#[tokio::test]
async fn test_reruns_with_supplied_ids_dispatch_identical_payloads() -> Result<()> {
    let rows = create_rows(&[
        &["ShopX", "12", "DYNAMIC", "ORD1", "RID-1"],
        &["Acme", "250", "RTP_LATER", "RAAST_ID", "0300", "ORD2", "RID-2"],
    ]);

    let first_gateway = ScriptedGateway::accepting();
    let second_gateway = ScriptedGateway::accepting();

    BatchPipeline::new(first_gateway.clone(), Arc::new(UuidRequestIds)).run_rows(rows.clone()).await;
    BatchPipeline::new(second_gateway.clone(), Arc::new(UuidRequestIds)).run_rows(rows).await;

    assert_eq!(first_gateway.calls(), second_gateway.calls());

    Ok(())
}

#[tokio::test]
async fn test_reruns_without_ids_differ_only_in_generated_ids() -> Result<()> {
    let rows = create_rows(&[
        &["ShopX", "12", "DYNAMIC", "ORD1"],
        &["Acme", "250", "RTP_NOW", "IBAN", "PK01", "ORD2"],
    ]);

    let first_gateway = ScriptedGateway::accepting();
    let second_gateway = ScriptedGateway::accepting();

    let first = BatchPipeline::new(first_gateway.clone(), Arc::new(UuidRequestIds)).run_rows(rows.clone()).await;
    let second = BatchPipeline::new(second_gateway.clone(), Arc::new(UuidRequestIds)).run_rows(rows).await;

    let first_calls = first_gateway.calls();
    let second_calls = second_gateway.calls();

    for (left, right) in first_calls.iter().zip(second_calls.iter()) {
        assert_ne!(left["request_id"], right["request_id"]);
        assert_eq!(left["order_id"], right["order_id"]);
        assert_eq!(left["amount"], right["amount"]);
    }

    let kinds = |report: &super::BatchReport| report.outcomes().map(|outcome| (outcome.kind.clone(), outcome.success)).collect::<Vec<_>>();

    assert_eq!(kinds(&first), kinds(&second));

    Ok(())
}

#[tokio::test]
async fn test_qr_rows_render_artifacts() -> Result<()> {
    let directory = tempdir()?;
    let gateway = ScriptedGateway::new(|call| match call {
        UpstreamCall::Qr(request) if request.order_id == "NOCODE" => Ok(UpstreamResponse::from_text(200, "{}")),
        _ => Ok(UpstreamResponse::from_text(201, r#"{"data":{"code":"00020101021226"}}"#))
    });
    let pipeline = create_pipeline(gateway)
        .with_renderer(Arc::new(QrRenderer::new(directory.path())), ArtifactSizes::default());

    let report = pipeline.run_rows(create_rows(&[
        &["ShopX", "12", "DYNAMIC", "ORD1", "RID-1"],
        &["ShopX", "0", "STATIC", "NOCODE", "RID-2"],
        &["ShopX", "-1", "DYNAMIC", "ORD3"],
        &["100", "PK02"],
    ])).await;

    let artifacts: Vec<_> = report.rows.iter().map(|row| row.artifact.clone()).collect();

    let rendered = artifacts[0].clone().ok_or_else(|| anyhow!("QR row 1 has no artifact"))?;
    let placeholder = artifacts[1].clone().ok_or_else(|| anyhow!("QR row 2 has no artifact"))?;

    assert!(matches!(rendered.preview, Glyph::Svg(_)));
    assert_eq!(rendered.download, Download::Saved(directory.path().join("qr_DYNAMIC_1_RID-1.png")));
    assert_eq!(placeholder.preview, Glyph::Placeholder);
    assert_eq!(placeholder.download, Download::Skipped);
    assert!(!report.rows[1].outcome.success);
    assert_eq!(artifacts[2], None);
    assert_eq!(artifacts[3], None);

    Ok(())
}

#[tokio::test]
async fn test_pipeline_runs_batch_file_and_skips_header() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "amount,creditor_iban")?;
    writeln!(file, "100.50,PK00BANK0000000000000001")?;
    writeln!(file, "ShopX,0,STATIC,ORD1")?;

    let gateway = ScriptedGateway::accepting();
    let report = create_pipeline(gateway.clone()).run(file.path()).await?;

    assert_eq!(report.len(), 2);
    assert_eq!(gateway.calls().len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_pipeline_fails_on_missing_batch_file() {
    let pipeline = create_pipeline(ScriptedGateway::accepting());

    assert!(pipeline.run(std::path::Path::new("missing-batch.csv")).await.is_err());
}

#[tokio::test]
async fn test_pipeline_header_only_batch_is_empty() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "amount,creditor_iban")?;
    writeln!(file)?;

    let gateway = ScriptedGateway::accepting();
    let report = create_pipeline(gateway.clone()).run(file.path()).await?;

    assert!(report.is_empty());
    assert!(gateway.calls().is_empty());
    assert_eq!(report.status_line(), "Done. 0 row(s) processed.");

    Ok(())
}

#[tokio::test]
async fn test_malformed_and_delimiter_only_rows_get_their_own_outcomes() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "amount,creditor_iban")?;
    writeln!(file, "1_000,PK02")?;
    writeln!(file, ",")?;
    writeln!(file, "Acme,1_0,RTP_NOW,IBAN,PK01,O")?;
    writeln!(file, "100.50,PK00BANK0000000000000001")?;

    let gateway = ScriptedGateway::accepting();
    let report = create_pipeline(gateway.clone()).run(file.path()).await?;

    let outcomes: Vec<_> = report.outcomes()
        .map(|outcome| (outcome.row_number, outcome.success, outcome.message.clone()))
        .collect();

    assert_eq!(outcomes, vec![
        (1, false, "Bad row: invalid amount".to_string()),
        (2, false, "Bad row: invalid amount".to_string()),
        (3, false, "Bad row: invalid amount".to_string()),
        (4, true, "PAYOUT Success".to_string()),
    ]);
    assert!(report.outcomes().take(3).all(|outcome| !outcome.was_dispatched()));

    let calls = gateway.calls();

    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0]["amount"], "100.50");

    Ok(())
}
