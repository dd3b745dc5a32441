/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use bytes::{Buf, BufMut};
use indexmap::IndexMap;

use crate::{ViciDecodeError, ViciEncodeError, ViciError};

const ELEMENT_SECTION_START: u8 = 1;
const ELEMENT_SECTION_END: u8 = 2;
const ELEMENT_KEY_VALUE: u8 = 3;
const ELEMENT_LIST_START: u8 = 4;
const ELEMENT_LIST_ITEM: u8 = 5;
const ELEMENT_LIST_END: u8 = 6;

const MAX_NESTING: usize = 32;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViciValue {
    Value(Vec<u8>),
    List(Vec<Vec<u8>>),
    Section(ViciMessage),
}

impl ViciValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ViciValue::Value(v) => std::str::from_utf8(v).ok(),
            _ => None,
        }
    }
}

/// An ordered tree of sections, lists and key values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViciMessage {
    items: IndexMap<String, ViciValue>,
}

impl ViciMessage {
    pub fn new() -> Self {
        ViciMessage::default()
    }

    /// `{"child": {"<name>": {}}}`, the request body of `initiate` and `terminate`.
    pub fn child_request(name: &str) -> Self {
        let mut child = ViciMessage::new();
        child.set_section(name, ViciMessage::new());
        let mut msg = ViciMessage::new();
        msg.set_section("child", child);
        msg
    }

    pub fn set(&mut self, key: impl Into<String>, value: ViciValue) {
        self.items.insert(key.into(), value);
    }

    pub fn set_value(&mut self, key: impl Into<String>, value: impl AsRef<[u8]>) {
        self.set(key, ViciValue::Value(value.as_ref().to_vec()));
    }

    pub fn set_section(&mut self, key: impl Into<String>, section: ViciMessage) {
        self.set(key, ViciValue::Section(section));
    }

    pub fn get(&self, key: &str) -> Option<&ViciValue> {
        self.items.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ViciValue::as_str)
    }

    pub fn get_section(&self, key: &str) -> Option<&ViciMessage> {
        match self.get(key)? {
            ViciValue::Section(s) => Some(s),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ViciValue)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check the `success` / `errmsg` pair of a command response.
    pub fn check_success(&self) -> Result<(), ViciError> {
        if self.get_str("success") == Some("yes") {
            return Ok(());
        }
        let reason = self
            .get_str("errmsg")
            .filter(|s| !s.is_empty())
            .unwrap_or("command failed");
        Err(ViciError::CommandFailed(reason.to_string()))
    }

    pub fn encoded_len(&self) -> usize {
        self.items
            .iter()
            .map(|(k, v)| {
                let value_len = match v {
                    ViciValue::Value(v) => 2 + v.len(),
                    ViciValue::List(items) => items.iter().map(|i| 3 + i.len()).sum::<usize>() + 1,
                    ViciValue::Section(s) => s.encoded_len() + 1,
                };
                2 + k.len() + value_len
            })
            .sum()
    }

    pub fn encode<B: BufMut>(&self, buf: &mut B) -> Result<(), ViciEncodeError> {
        for (key, value) in &self.items {
            match value {
                ViciValue::Value(v) => {
                    buf.put_u8(ELEMENT_KEY_VALUE);
                    put_name(buf, key)?;
                    put_value(buf, v)?;
                }
                ViciValue::List(items) => {
                    buf.put_u8(ELEMENT_LIST_START);
                    put_name(buf, key)?;
                    for item in items {
                        buf.put_u8(ELEMENT_LIST_ITEM);
                        put_value(buf, item)?;
                    }
                    buf.put_u8(ELEMENT_LIST_END);
                }
                ViciValue::Section(s) => {
                    buf.put_u8(ELEMENT_SECTION_START);
                    put_name(buf, key)?;
                    s.encode(buf)?;
                    buf.put_u8(ELEMENT_SECTION_END);
                }
            }
        }
        Ok(())
    }

    pub fn decode(mut buf: &[u8]) -> Result<Self, ViciDecodeError> {
        decode_section(&mut buf, 0)
    }
}

fn put_name<B: BufMut>(buf: &mut B, name: &str) -> Result<(), ViciEncodeError> {
    let len = u8::try_from(name.len()).map_err(|_| ViciEncodeError::NameTooLong(name.len()))?;
    buf.put_u8(len);
    buf.put_slice(name.as_bytes());
    Ok(())
}

fn put_value<B: BufMut>(buf: &mut B, value: &[u8]) -> Result<(), ViciEncodeError> {
    let len =
        u16::try_from(value.len()).map_err(|_| ViciEncodeError::ValueTooLong(value.len()))?;
    buf.put_u16(len);
    buf.put_slice(value);
    Ok(())
}

pub(crate) fn get_name(buf: &mut &[u8]) -> Result<String, ViciDecodeError> {
    if buf.remaining() < 1 {
        return Err(ViciDecodeError::NotEnoughData);
    }
    let len = buf.get_u8() as usize;
    if buf.remaining() < len {
        return Err(ViciDecodeError::NotEnoughData);
    }
    let name = std::str::from_utf8(&buf[..len])
        .map_err(|_| ViciDecodeError::InvalidName)?
        .to_string();
    buf.advance(len);
    Ok(name)
}

fn get_value(buf: &mut &[u8]) -> Result<Vec<u8>, ViciDecodeError> {
    if buf.remaining() < 2 {
        return Err(ViciDecodeError::NotEnoughData);
    }
    let len = buf.get_u16() as usize;
    if buf.remaining() < len {
        return Err(ViciDecodeError::NotEnoughData);
    }
    let value = buf[..len].to_vec();
    buf.advance(len);
    Ok(value)
}

fn decode_list(buf: &mut &[u8]) -> Result<Vec<Vec<u8>>, ViciDecodeError> {
    let mut items = Vec::new();
    loop {
        if !buf.has_remaining() {
            return Err(ViciDecodeError::UnclosedList);
        }
        match buf.get_u8() {
            ELEMENT_LIST_ITEM => items.push(get_value(buf)?),
            ELEMENT_LIST_END => return Ok(items),
            t => return Err(ViciDecodeError::InvalidElementType(t)),
        }
    }
}

fn decode_section(buf: &mut &[u8], depth: usize) -> Result<ViciMessage, ViciDecodeError> {
    if depth > MAX_NESTING {
        return Err(ViciDecodeError::TooDeepNesting);
    }

    let mut msg = ViciMessage::new();
    loop {
        if !buf.has_remaining() {
            return if depth == 0 {
                Ok(msg)
            } else {
                Err(ViciDecodeError::UnclosedSection)
            };
        }

        match buf.get_u8() {
            ELEMENT_SECTION_START => {
                let name = get_name(buf)?;
                let section = decode_section(buf, depth + 1)?;
                msg.set_section(name, section);
            }
            ELEMENT_SECTION_END => {
                return if depth == 0 {
                    Err(ViciDecodeError::UnexpectedSectionEnd)
                } else {
                    Ok(msg)
                };
            }
            ELEMENT_KEY_VALUE => {
                let name = get_name(buf)?;
                let value = get_value(buf)?;
                msg.set(name, ViciValue::Value(value));
            }
            ELEMENT_LIST_START => {
                let name = get_name(buf)?;
                let items = decode_list(buf)?;
                msg.set(name, ViciValue::List(items));
            }
            ELEMENT_LIST_ITEM | ELEMENT_LIST_END => {
                return Err(ViciDecodeError::UnexpectedListItem);
            }
            t => return Err(ViciDecodeError::InvalidElementType(t)),
        }
    }
}
