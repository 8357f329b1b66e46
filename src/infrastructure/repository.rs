//! 题库 - 基础设施层
//!
//! 编译过程只读题库，从不写入。

use crate::error::RepositoryError;
use crate::models::question::Question;
use indexmap::IndexMap;

/// 题库
pub trait QuestionRepository {
    /// 按名称查找题目；不存在时返回 `None`
    fn find(&self, name: &str) -> Result<Option<Question>, RepositoryError>;

    /// 全部题目
    fn list(&self) -> Result<Vec<Question>, RepositoryError>;
}

/// 内存题库（保持插入顺序）
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    questions: IndexMap<String, Question>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 重名题目只保留第一条
    pub fn from_questions(questions: impl IntoIterator<Item = Question>) -> Self {
        let mut repository = Self::new();
        for question in questions {
            repository.insert(question);
        }
        repository
    }

    /// 插入题目，名称已存在时返回 false
    pub fn insert(&mut self, question: Question) -> bool {
        if self.questions.contains_key(&question.name) {
            return false;
        }
        self.questions.insert(question.name.clone(), question);
        true
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl QuestionRepository for MemoryRepository {
    fn find(&self, name: &str) -> Result<Option<Question>, RepositoryError> {
        Ok(self.questions.get(name).cloned())
    }

    fn list(&self) -> Result<Vec<Question>, RepositoryError> {
        Ok(self.questions.values().cloned().collect())
    }
}
