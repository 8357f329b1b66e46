//! 题目文档节点
//!
//! 编码器只追加节点，不维护"当前插入位置"；最后由 quick-xml 统一序列化。

use crate::error::XmlError;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// 文档节点
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(Element),
    /// 普通文本（序列化时转义）
    Text(String),
    /// CDATA 文本（富文本 HTML）
    CData(String),
    Comment(String),
}

/// XML 元素
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// `<tag>text</tag>`
    pub fn with_text(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(tag).node(XmlNode::Text(text.into()))
    }

    /// `<tag><![CDATA[text]]></tag>`
    pub fn with_cdata(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(tag).node(XmlNode::CData(text.into()))
    }

    /// `<tag><text>text</text></tag>`
    pub fn text_block(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(tag).child(Self::with_text("text", text))
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    pub fn child(mut self, element: Element) -> Self {
        self.push(element);
        self
    }

    pub fn node(mut self, node: XmlNode) -> Self {
        self.children.push(node);
        self
    }

    pub fn push(&mut self, element: Element) {
        self.children.push(XmlNode::Element(element));
    }

    pub fn push_node(&mut self, node: XmlNode) {
        self.children.push(node);
    }

    pub fn extend(&mut self, elements: impl IntoIterator<Item = Element>) {
        self.children
            .extend(elements.into_iter().map(XmlNode::Element));
    }

    // ========== 查询 ==========

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// 直接子元素
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// 第一个名为 `tag` 的直接子元素
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.elements().find(|e| e.tag == tag)
    }

    /// 所有名为 `tag` 的直接子元素
    pub fn find_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements().filter(move |e| e.tag == tag)
    }

    /// 直接子元素的标签（按顺序）
    pub fn child_tags(&self) -> Vec<&str> {
        self.elements().map(|e| e.tag.as_str()).collect()
    }

    /// 直接文本内容（Text 与 CDATA 拼接）
    pub fn text_content(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                XmlNode::Text(s) | XmlNode::CData(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    // ========== 序列化 ==========

    pub fn write<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), XmlError> {
        let mut start = BytesStart::new(self.tag.as_str());
        for (key, value) in &self.attrs {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            writer
                .write_event(Event::Empty(start))
                .map_err(XmlError::from_display)?;
            return Ok(());
        }

        writer
            .write_event(Event::Start(start))
            .map_err(XmlError::from_display)?;
        for child in &self.children {
            write_node(child, writer)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.tag.as_str())))
            .map_err(XmlError::from_display)?;
        Ok(())
    }

    /// 不带缩进的单行 XML（用于嵌入题干的 HTML 片段）
    pub fn to_xml_string(&self) -> Result<String, XmlError> {
        let mut writer = Writer::new(Vec::new());
        self.write(&mut writer)?;
        String::from_utf8(writer.into_inner()).map_err(XmlError::from_display)
    }
}

fn write_node<W: Write>(node: &XmlNode, writer: &mut Writer<W>) -> Result<(), XmlError> {
    match node {
        XmlNode::Element(element) => element.write(writer),
        XmlNode::Text(text) => writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(XmlError::from_display),
        XmlNode::CData(text) => {
            // "]]>" 不能出现在 CDATA 内部，需要拆成两段
            let escaped = text.replace("]]>", "]]]]><![CDATA[>");
            writer
                .write_event(Event::CData(BytesCData::new(escaped.as_str())))
                .map_err(XmlError::from_display)
        }
        XmlNode::Comment(text) => writer
            .write_event(Event::Comment(BytesText::from_escaped(format!(" {} ", text))))
            .map_err(XmlError::from_display),
    }
}

/// 完整文档：XML 声明 + 头部注释 + 根元素（两空格缩进）
pub fn render_document(header_comment: &str, root: &Element) -> Result<String, XmlError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(XmlError::from_display)?;
    write_node(&XmlNode::Comment(header_comment.to_string()), &mut writer)?;
    root.write(&mut writer)?;

    let mut output = String::from_utf8(writer.into_inner()).map_err(XmlError::from_display)?;
    output.push('\n');
    Ok(output)
}
