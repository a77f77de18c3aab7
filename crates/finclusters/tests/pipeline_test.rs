//! End-to-end tests of the dashboard pipeline against in-memory reference
//! tables and a static market-data gateway.

use approx::assert_relative_eq;
use finclusters::data::{
    ActiveCompanies, ClusterMembership, CoefficientTable, ErrorKind, GicsSector, MarketSnapshot,
    RateSource, ReferenceStore, StaticMarketData,
};
use finclusters::models::{FactorPremiums, PremiumScenario, PricingConfig};
use finclusters::output::{Exporter, ExportFormat, UNAVAILABLE};
use finclusters::{AnalysisRequest, Dashboard, Session};
use rstest::{fixture, rstest};

const COEFFICIENTS: &str = "\
ticker,sector,cluster,model,intercept,coef_1,coef_2,coef_3,coef_4
AAPL,GICS_45,2,CAPM,0.0021,1.12,,,
MSFT,GICS_45,2,CAPM,0.0010,0.90,,,
NVDA,GICS_45,2,CAPM,0.0040,1.70,,,
ORCL,GICS_45,2,FF3,0.0005,0.80,0.30,0.10,
BADX,GICS_45,2,CAPM,0.0010,1.00,0.50,,
BIGR,GICS_45,5,CAPM,0.0,4.0,,,
NEWCO,GICS_45,2,CAPM,0.0010,1.00,,,
AMZN,GICS_25,1,FF3,0.0010,1.05,0.20,-0.30,
ODD,unsupported,,CAPM,0.0010,1.00,,,
";

const MEMBERSHIP: &str = "\
tic,fyear,cluster,pca_1,pca_2
AAPL,2022.0,1,0.10,0.20
AAPL,2023.0,2,0.15,0.25
MSFT,2023.0,2,0.30,0.10
NVDA,2023.0,2,0.50,-0.20
ORCL,2023.0,2,-0.10,0.40
INTC,2023.0,2,-0.30,0.10
BADX,2023.0,2,0.00,0.00
BIGR,2023.0,5,1.20,1.10
SOLX,2023.0,5,1.10,1.00
";

fn store() -> ReferenceStore {
    let coefficients = CoefficientTable::from_reader(COEFFICIENTS.as_bytes()).unwrap();
    let active = ActiveCompanies::new([
        "AAPL", "MSFT", "NVDA", "ORCL", "INTC", "BADX", "BIGR", "NEWCO", "AMZN", "ODD",
    ]);
    let membership =
        ClusterMembership::from_reader(GicsSector::InformationTechnology, MEMBERSHIP.as_bytes())
            .unwrap();
    ReferenceStore::new(coefficients, active).with_membership(membership)
}

fn gateway() -> StaticMarketData {
    StaticMarketData::new()
        .with_risk_free_rate(0.042)
        .with_quote(MarketSnapshot {
            ticker: "AAPL".to_string(),
            long_name: Some("Apple Inc.".to_string()),
            spot_price: Some(190.0),
            forward_eps: Some(6.0),
            forward_pe: Some(25.0),
            sector_label: Some("Technology".to_string()),
            fetched_at: None,
        })
        .with_quote(MarketSnapshot {
            ticker: "BIGR".to_string(),
            forward_eps: Some(6.0),
            ..MarketSnapshot::default()
        })
        .with_quote(MarketSnapshot {
            ticker: "ODD".to_string(),
            sector_label: Some("Energy".to_string()),
            ..MarketSnapshot::default()
        })
}

fn trailing_pricing() -> PricingConfig {
    PricingConfig {
        historical_premiums: FactorPremiums {
            market: 0.0062,
            ..FactorPremiums::default()
        },
        ..PricingConfig::default()
    }
}

#[fixture]
fn reference() -> ReferenceStore {
    store()
}

#[rstest]
#[tokio::test]
async fn test_capm_dashboard(reference: ReferenceStore) {
    let gateway = gateway();
    let pricing = trailing_pricing();
    let dashboard = Dashboard::new(&reference, &gateway, &pricing);

    let request = AnalysisRequest::new("aapl").with_risk_free(Some(0.004));
    let output = dashboard.run(&request).await.unwrap();

    assert_eq!(output.ticker(), "AAPL");
    assert_eq!(output.risk_free.source, RateSource::Manual);
    // 0.0021 + 1.12 * 0.0062 + 0.004
    assert_relative_eq!(output.returns.expected.point, 0.013044, epsilon = 1e-12);

    let subject = &output.peer_set.as_ref().unwrap().subject;
    assert_eq!(subject.cluster_id, 2);
    assert_eq!(subject.fiscal_year, 2023);
    assert_eq!(output.peers(), ["BADX", "INTC", "MSFT", "NVDA", "ORCL"]);

    let range = output.returns.peer_range.as_ref().unwrap();
    assert_eq!(range.evaluated, vec!["MSFT", "NVDA"]);
    assert_eq!(range.skipped, vec!["BADX", "INTC", "ORCL"]);
    assert_relative_eq!(range.min, 0.0010 + 0.90 * 0.0062 + 0.004, epsilon = 1e-12);
    assert_relative_eq!(range.max, 0.0040 + 1.70 * 0.0062 + 0.004, epsilon = 1e-12);

    assert_relative_eq!(output.returns.analyst.unwrap(), 0.07, epsilon = 1e-12);

    // Monthly returns below the terminal growth rate cannot be capitalized.
    assert_eq!(output.forecast.model_price, None);
    assert_eq!(output.forecast.peer_price_range, None);
    assert_relative_eq!(output.forecast.analyst_price.unwrap(), 150.0, epsilon = 1e-9);
}

#[rstest]
#[tokio::test]
async fn test_model_price_and_empty_peers(reference: ReferenceStore) {
    let gateway = gateway();
    let pricing = PricingConfig::default();
    let dashboard = Dashboard::new(&reference, &gateway, &pricing);

    let request = AnalysisRequest::new("BIGR").with_risk_free(Some(0.04));
    let output = dashboard.run(&request).await.unwrap();

    // 0.0 + 4.0 * 0.01 + 0.04 = 0.08; 6 / (0.08 - 0.03) = 120
    assert_relative_eq!(output.returns.expected.point, 0.08, epsilon = 1e-12);
    assert_relative_eq!(output.forecast.model_price.unwrap(), 120.0, epsilon = 1e-9);

    // SOLX shares the cluster but is not active.
    assert!(output.peers().is_empty());
    assert_eq!(output.returns.peer_range, None);
    assert_eq!(output.forecast.peer_price_range, None);
    assert_eq!(output.returns.analyst, None);
    assert_eq!(output.forecast.analyst_price, None);
    assert!(output.notes.iter().any(|n| n.contains("no active peers")));

    let table = output.to_report().unwrap().to_ascii_table();
    assert!(table.contains("Peer-Based:            unavailable"));
    assert!(table.contains("120.00"));
}

#[rstest]
#[tokio::test]
async fn test_risk_free_sources(reference: ReferenceStore) {
    let pricing = PricingConfig::default();

    let live = gateway();
    let dashboard = Dashboard::new(&reference, &live, &pricing);
    let rate = dashboard.risk_free_rate(None).await.unwrap();
    assert_eq!(rate.source, RateSource::Live);
    assert_relative_eq!(rate.value, 0.042);

    let rate = dashboard.risk_free_rate(Some(0.05)).await.unwrap();
    assert_eq!(rate.source, RateSource::Manual);

    let offline = StaticMarketData::new();
    let dashboard = Dashboard::new(&reference, &offline, &pricing);
    let output = dashboard.run(&AnalysisRequest::new("AAPL")).await.unwrap();
    assert!(output.risk_free.is_fallback());
    assert_relative_eq!(output.risk_free.value, 0.04);
    assert_relative_eq!(output.returns.expected.risk_free, 0.04);

    // Missing quote degrades to an empty snapshot.
    assert_eq!(output.snapshot.forward_eps, None);
    assert_eq!(output.forecast.analyst_price, None);
    assert!(output.forecast.is_empty());
}

#[rstest]
#[tokio::test]
async fn test_pipeline_is_idempotent(reference: ReferenceStore) {
    let gateway = gateway();
    let pricing = trailing_pricing();
    let dashboard = Dashboard::new(&reference, &gateway, &pricing);
    let request = AnalysisRequest::new("AAPL");

    let first = dashboard.run(&request).await.unwrap();
    let second = dashboard.run(&request).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.to_report().unwrap().without_timestamp(),
        second.to_report().unwrap().without_timestamp()
    );
}

#[rstest]
#[case("ZZZZ", ErrorKind::NotFound)]
#[case("BADX", ErrorKind::ModelConsistency)]
#[case("", ErrorKind::InvalidInput)]
#[tokio::test]
async fn test_terminal_errors(#[case] ticker: &str, #[case] kind: ErrorKind) {
    let reference = store();
    let gateway = gateway();
    let pricing = PricingConfig::default();
    let dashboard = Dashboard::new(&reference, &gateway, &pricing);

    let err = dashboard.run(&AnalysisRequest::new(ticker)).await.unwrap_err();
    assert_eq!(err.kind(), kind);
}

#[rstest]
#[tokio::test]
async fn test_forward_looking_scenario(reference: ReferenceStore) {
    let gateway = gateway();
    let pricing = PricingConfig::default();
    let dashboard = Dashboard::new(&reference, &gateway, &pricing);

    let request = AnalysisRequest::new("AAPL")
        .with_risk_free(Some(0.04))
        .with_scenario(PremiumScenario::ForwardLooking);
    let output = dashboard.run(&request).await.unwrap();
    assert_relative_eq!(
        output.returns.expected.point,
        0.0021 + 1.12 * 0.0442 + 0.04,
        epsilon = 1e-12
    );

    // Forward-looking premiums only exist for CAPM.
    let request = AnalysisRequest::new("AMZN").with_scenario(PremiumScenario::ForwardLooking);
    let err = dashboard.run(&request).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[rstest]
#[tokio::test]
async fn test_peer_failures_do_not_stop_estimates(reference: ReferenceStore) {
    let gateway = gateway();
    let pricing = PricingConfig::default();
    let dashboard = Dashboard::new(&reference, &gateway, &pricing);

    // NEWCO has coefficients but no membership row; AMZN's sector has no
    // membership table; ODD's sector code is not a GICS sector, so its
    // sector comes from the market-data label.
    for (ticker, sector) in [
        ("NEWCO", GicsSector::InformationTechnology),
        ("AMZN", GicsSector::ConsumerDiscretionary),
        ("ODD", GicsSector::Energy),
    ] {
        let output = dashboard.run(&AnalysisRequest::new(ticker)).await.unwrap();
        assert!(output.peer_set.is_none());
        assert!(output.returns.peer_range.is_none());
        assert!(output.notes.iter().any(|n| n.starts_with("peers unavailable")));
        assert_eq!(output.sector, Some(sector));

        let report = output.to_report().unwrap();
        assert_eq!(report.company.sector, Some(sector));
        assert!(report.to_ascii_table().contains(UNAVAILABLE));
    }

    let odd = dashboard.run(&AnalysisRequest::new("ODD")).await.unwrap();
    assert_relative_eq!(odd.returns.expected.point, 0.0010 + 0.01 + 0.042, epsilon = 1e-12);
}

#[rstest]
#[tokio::test]
async fn test_session_refresh(reference: ReferenceStore) {
    let gateway = gateway();
    let pricing = PricingConfig::default();
    let dashboard = Dashboard::new(&reference, &gateway, &pricing);

    let mut session = Session::new();
    session.select_ticker("AAPL").unwrap();
    session.set_risk_free(Some(0.045)).unwrap();
    let output = session.refresh(&dashboard).await.unwrap();
    assert_eq!(output.risk_free.source, RateSource::Manual);
    assert!(session.last().is_some());

    session.select_ticker("MSFT").unwrap();
    assert!(session.last().is_none());

    let output = session.refresh(&dashboard).await.unwrap();
    assert_eq!(output.ticker(), "MSFT");
    assert_relative_eq!(output.risk_free.value, 0.045);

    session.select_ticker("ZZZZ").unwrap();
    assert!(session.refresh(&dashboard).await.is_err());
    assert!(session.last().is_none());
}

#[rstest]
#[tokio::test]
async fn test_report_export(reference: ReferenceStore) {
    let gateway = gateway();
    let pricing = trailing_pricing();
    let dashboard = Dashboard::new(&reference, &gateway, &pricing);

    let output = dashboard.run(&AnalysisRequest::new("AAPL")).await.unwrap();
    let report = output.to_report().unwrap();
    assert_eq!(report.company.name.as_deref(), Some("Apple Inc."));
    assert_eq!(report.company.sector, Some(GicsSector::InformationTechnology));

    let peers = report.peer_records().export_to_string(ExportFormat::Csv).unwrap();
    assert_eq!(peers.lines().count(), 6);

    let csv = report.export_to_string(ExportFormat::Csv).unwrap();
    assert!(csv.contains("AAPL,analyst,"));
    assert!(csv.contains(",150.0"));
}
