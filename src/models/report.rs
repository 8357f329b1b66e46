use std::fmt;

/// 单道题目没有进入导出文件的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// 题库中不存在
    Missing,
    /// 题目存在但无法编码
    Malformed(String),
}

/// 一条问题记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub name: String,
    pub kind: IssueKind,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::Missing => write!(f, "{} | 题库中不存在", self.name),
            IssueKind::Malformed(reason) => write!(f, "{} | 无法编码: {}", self.name, reason),
        }
    }
}

/// 一次考试编译的问题报告
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileReport {
    pub issues: Vec<Issue>,
}

impl CompileReport {
    pub fn missing(&mut self, name: impl Into<String>) {
        self.issues.push(Issue {
            name: name.into(),
            kind: IssueKind::Missing,
        });
    }

    pub fn malformed(&mut self, name: impl Into<String>, reason: impl fmt::Display) {
        self.issues.push(Issue {
            name: name.into(),
            kind: IssueKind::Malformed(reason.to_string()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// 报告中出现的题目名称（按出现顺序）
    pub fn names(&self) -> Vec<&str> {
        self.issues.iter().map(|issue| issue.name.as_str()).collect()
    }
}
