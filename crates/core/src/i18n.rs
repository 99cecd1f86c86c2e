use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

/// Display language for labels and messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Zh,
    En,
}

impl Language {
    /// The other language (for a toggle).
    pub fn toggled(self) -> Self {
        match self {
            Language::Zh => Language::En,
            Language::En => Language::Zh,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Zh => write!(f, "zh"),
            Language::En => write!(f, "en"),
        }
    }
}

impl FromStr for Language {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zh" | "cn" | "zh-cn" => Ok(Language::Zh),
            "en" | "en-us" => Ok(Language::En),
            other => Err(CoreError::Validation(format!("Unknown language: {other}"))),
        }
    }
}

/// Translation lookup passed explicitly to anything that renders text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Locale {
    language: Language,
}

impl Locale {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Translate a key. Unknown keys are returned unchanged.
    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        let table = match self.language {
            Language::Zh => ZH,
            Language::En => EN,
        };
        table
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .unwrap_or(key)
    }
}

const ZH: &[(&str, &str)] = &[
    ("title", "投资组合管理系统"),
    ("subtitle", "专业投资组合分析与跟踪平台"),
    ("clientName", "客户姓名"),
    ("startDate", "起始日期"),
    ("initialBalance", "初始余额"),
    ("portfolioAllocation", "投资组合分配"),
    ("stockSymbol", "股票代码"),
    ("percentage", "百分比"),
    ("calculateReturns", "计算收益"),
    ("portfolioPerformance", "投资组合表现"),
    ("individualStockPerformance", "个股表现"),
    ("overallPortfolioReturn", "整体投资组合收益"),
    ("previousSearches", "历史查询"),
    ("initialValue", "初始价值"),
    ("currentValue", "当前价值"),
    ("totalReturn", "总收益"),
    ("returnPercentage", "收益率"),
    ("loading", "加载中..."),
    ("error", "错误"),
    ("noData", "暂无数据"),
    ("searchHistory", "查询历史"),
    ("allocationChart", "分配图表"),
    ("performanceChart", "表现图表"),
    ("historicalQueries", "历史查询"),
    ("dateRange", "可选日期范围"),
    ("dateSuggestions", "快捷选择"),
    ("oneMonthAgo", "1个月前"),
    ("threeMonthsAgo", "3个月前"),
    ("sixMonthsAgo", "6个月前"),
    ("calculationDone", "投资组合计算完成"),
    ("saveFailed", "保存历史记录失败"),
    ("savedAs", "已保存，记录编号"),
    ("timestamp", "计算时间"),
];

const EN: &[(&str, &str)] = &[
    ("title", "Portfolio Management System"),
    ("subtitle", "Professional Portfolio Analysis & Tracking Platform"),
    ("clientName", "Client Name"),
    ("startDate", "Start Date"),
    ("initialBalance", "Initial Balance"),
    ("portfolioAllocation", "Portfolio Allocation"),
    ("stockSymbol", "Stock Symbol"),
    ("percentage", "Percentage"),
    ("calculateReturns", "Calculate Returns"),
    ("portfolioPerformance", "Portfolio Performance"),
    ("individualStockPerformance", "Individual Stock Performance"),
    ("overallPortfolioReturn", "Overall Portfolio Return"),
    ("previousSearches", "Previous Searches"),
    ("initialValue", "Initial Value"),
    ("currentValue", "Current Value"),
    ("totalReturn", "Total Return"),
    ("returnPercentage", "Return %"),
    ("loading", "Loading..."),
    ("error", "Error"),
    ("noData", "No Data"),
    ("searchHistory", "Search History"),
    ("allocationChart", "Allocation Chart"),
    ("performanceChart", "Performance Chart"),
    ("historicalQueries", "Historical Queries"),
    ("dateRange", "Allowed start dates"),
    ("dateSuggestions", "Shortcuts"),
    ("oneMonthAgo", "1 month ago"),
    ("threeMonthsAgo", "3 months ago"),
    ("sixMonthsAgo", "6 months ago"),
    ("calculationDone", "Portfolio calculation complete"),
    ("saveFailed", "Failed to save history record"),
    ("savedAs", "Saved as record"),
    ("timestamp", "Calculated At"),
];
