//! Rule table mapping signal and anomaly states to alert events.

use flowwatch_core::{
    Alert, AlertAction, AlertConfig, AlertKind, AlertSeverity, AnomalyRecord, RsiSignal,
    TechnicalSignalBundle, TrendSignal, UtcDateTime,
};

/// Stateless alert generator. Every call emits a fresh list; nothing is
/// deduplicated across calls.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AlertMapper {
    config: AlertConfig,
}

impl AlertMapper {
    pub fn new(config: AlertConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlertConfig {
        &self.config
    }

    /// Alerts stamped with the current time.
    pub fn generate(
        &self,
        signals: &TechnicalSignalBundle,
        anomalies: Option<&[AnomalyRecord]>,
    ) -> Vec<Alert> {
        self.generate_at(signals, anomalies, UtcDateTime::now())
    }

    /// Alerts stamped with `timestamp`, in rule order: RSI, moving average,
    /// volume, then one alert per qualifying anomaly in input order.
    pub fn generate_at(
        &self,
        signals: &TechnicalSignalBundle,
        anomalies: Option<&[AnomalyRecord]>,
        timestamp: UtcDateTime,
    ) -> Vec<Alert> {
        let alert = |kind, severity, action, message: String| Alert {
            kind,
            severity,
            message,
            action,
            timestamp,
        };
        let mut alerts = Vec::new();

        match signals.rsi_signal {
            RsiSignal::Overbought => alerts.push(alert(
                AlertKind::RsiOverbought,
                AlertSeverity::High,
                AlertAction::Sell,
                format!("RSI {:.2} indicates overbought conditions", signals.rsi),
            )),
            RsiSignal::Oversold => alerts.push(alert(
                AlertKind::RsiOversold,
                AlertSeverity::High,
                AlertAction::Buy,
                format!("RSI {:.2} indicates oversold conditions", signals.rsi),
            )),
            RsiSignal::Neutral => {}
        }

        match signals.ma_signal {
            TrendSignal::Bullish => alerts.push(alert(
                AlertKind::MaBullish,
                AlertSeverity::Low,
                AlertAction::Buy,
                String::from("Moving average indicates a bullish trend"),
            )),
            TrendSignal::Bearish => alerts.push(alert(
                AlertKind::MaBearish,
                AlertSeverity::Medium,
                AlertAction::Sell,
                String::from("Moving average indicates a bearish trend"),
            )),
            TrendSignal::Neutral => {}
        }

        if signals.volume_signal.is_elevated() {
            alerts.push(alert(
                AlertKind::VolumeHigh,
                AlertSeverity::Medium,
                AlertAction::Monitor,
                format!("Trading volume above average: {}", signals.volume_description),
            ));
        }

        let threshold = self.config.anomaly_confidence_threshold;
        for anomaly in anomalies
            .unwrap_or_default()
            .iter()
            .filter(|anomaly| anomaly.anomaly_confidence > threshold)
        {
            alerts.push(alert(
                AlertKind::AnomalyDetected,
                AlertSeverity::High,
                AlertAction::Investigate,
                format!(
                    "Anomaly detected with {:.2}% confidence",
                    anomaly.anomaly_confidence * 100.0
                ),
            ));
        }

        alerts
    }
}
