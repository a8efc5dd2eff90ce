use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Generic role used for report types without a dedicated mapping
pub const GENERIC_ROLE: &str = "World Vision의 보고서 작성 전문가";

/// Report category selecting the role framing and the output layout
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReportType {
    /// 업무 보고서
    BusinessReport,
    /// 회의록 요약
    MeetingMinutes,
    /// 프로젝트 현황
    ProjectStatus,
    /// 데이터 분석 보고서
    DataAnalysis,
    /// Any other label; falls back to the generic role and business layout
    Custom(String),
}

impl ReportType {
    /// The four built-in types, in menu order
    pub const BUILTIN: [ReportType; 4] = [
        ReportType::BusinessReport,
        ReportType::MeetingMinutes,
        ReportType::ProjectStatus,
        ReportType::DataAnalysis,
    ];

    /// Parse a label; unknown labels become `Custom` rather than an error
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        match label {
            "업무 보고서" | "business" | "business-report" => Self::BusinessReport,
            "회의록 요약" | "meeting" | "meeting-minutes" => Self::MeetingMinutes,
            "프로젝트 현황" | "project" | "project-status" => Self::ProjectStatus,
            "데이터 분석 보고서" | "data" | "data-analysis" => Self::DataAnalysis,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Display label used inside prompts
    pub fn label(&self) -> &str {
        match self {
            Self::BusinessReport => "업무 보고서",
            Self::MeetingMinutes => "회의록 요약",
            Self::ProjectStatus => "프로젝트 현황",
            Self::DataAnalysis => "데이터 분석 보고서",
            Self::Custom(label) => label,
        }
    }

    /// Role the assistant is asked to play
    pub fn role(&self) -> &'static str {
        match self {
            Self::BusinessReport => "World Vision의 업무 보고서 작성 전문가",
            Self::MeetingMinutes => "효율적인 회의록 요약 전문가",
            Self::ProjectStatus => "프로젝트 관리 및 현황 분석 전문가",
            Self::DataAnalysis => "데이터 기반 인사이트 도출 전문가",
            Self::Custom(_) => GENERIC_ROLE,
        }
    }

    /// File-name-safe tag
    pub fn file_tag(&self) -> String {
        match self {
            Self::BusinessReport => "business_report".to_string(),
            Self::MeetingMinutes => "meeting_minutes".to_string(),
            Self::ProjectStatus => "project_status".to_string(),
            Self::DataAnalysis => "data_analysis".to_string(),
            Self::Custom(label) => {
                let tag = unsafe_file_chars().replace_all(label.trim(), "_");
                let tag = tag.trim_matches('_');
                if tag.is_empty() {
                    "report".to_string()
                } else {
                    tag.to_string()
                }
            }
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

fn unsafe_file_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^\w\-]+").expect("valid file tag pattern"))
}

impl Default for ReportType {
    fn default() -> Self {
        Self::BusinessReport
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReportType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

impl From<String> for ReportType {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<ReportType> for String {
    fn from(report_type: ReportType) -> Self {
        report_type.label().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_labels_round_trip() {
        for report_type in ReportType::BUILTIN {
            assert_eq!(ReportType::from_label(report_type.label()), report_type);
            assert!(report_type.is_builtin());
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!(ReportType::from_label("meeting"), ReportType::MeetingMinutes);
        assert_eq!(
            ReportType::from_label(" 데이터 분석 보고서 "),
            ReportType::DataAnalysis
        );
    }

    #[test]
    fn test_unknown_label_falls_back() {
        let report_type = ReportType::from_label("분기 실적 보고");
        assert_eq!(report_type, ReportType::Custom("분기 실적 보고".to_string()));
        assert_eq!(report_type.role(), GENERIC_ROLE);
        assert_eq!(report_type.label(), "분기 실적 보고");
    }

    #[test]
    fn test_file_tags() {
        assert_eq!(ReportType::MeetingMinutes.file_tag(), "meeting_minutes");
        assert_eq!(
            ReportType::Custom("Q3 / board: summary".to_string()).file_tag(),
            "Q3_board_summary"
        );
        assert_eq!(ReportType::Custom("???".to_string()).file_tag(), "report");
    }

    #[test]
    fn test_serde_as_label() {
        let json = serde_json::to_string(&ReportType::ProjectStatus).unwrap();
        assert_eq!(json, "\"프로젝트 현황\"");
        let parsed: ReportType = serde_json::from_str("\"custom kind\"").unwrap();
        assert_eq!(parsed, ReportType::Custom("custom kind".to_string()));
    }
}
