//! Reply field accessors.
//!
//! Every field of a reply payload gets one accessor on the payload class, in
//! declaration order. Scalar fields read the payload member directly. List
//! fields get an accessor templated on the element representation (defaulting
//! to the declared element type) plus an explicit specialization for the
//! declared type that reads the elements in place through the C data helper.

use ir::{Field, FieldKind, Reply};

use crate::templates::{
    ListAccessor, ListAccessorSpecialization, Render, ReplyPayloadClass, ScalarAccessor,
};
use crate::utils::{sanitize_cpp_identifier, snake_to_pascal_case};

/// Element count of a list field, shared by both of its accessors
pub fn length_bound(field: &Field) -> Option<String> {
    match &field.kind {
        FieldKind::List { length } => Some(format!(
            "static_cast<std::size_t>({})",
            length.render(&|name: &str| format!("this->get()->{}", name))
        )),
        FieldKind::Scalar => None,
    }
}

/// Generates the accessors of one reply payload
#[derive(Debug, Clone)]
pub struct FieldAccessorGenerator<'a> {
    class: String,
    symbol: String,
    reply: &'a Reply,
}

impl<'a> FieldAccessorGenerator<'a> {
    /// Create a generator for the payload class `class` of the C request `symbol`
    pub fn new(class: &str, symbol: &str, reply: &'a Reply) -> Self {
        Self { class: class.to_string(), symbol: symbol.to_string(), reply }
    }

    /// C reply structure
    pub fn reply_type(&self) -> String { format!("{}_reply_t", self.symbol) }

    /// Accessor of one field
    pub fn accessor(&self, field: &Field) -> String {
        let name = sanitize_cpp_identifier(&field.name);
        match length_bound(field) {
            None => {
                ScalarAccessor { ty: field.ty.clone(), name, member: field.name.clone() }.render()
            }
            Some(bound) => ListAccessor {
                type_param: snake_to_pascal_case(&field.name),
                ty: field.ty.clone(),
                name,
                bound,
            }
            .render(),
        }
    }

    /// Specialization of a list field's accessor for its declared type
    pub fn specialization(&self, field: &Field) -> Option<String> {
        length_bound(field).map(|bound| {
            ListAccessorSpecialization {
                ty: field.ty.clone(),
                class: self.class.clone(),
                name: sanitize_cpp_identifier(&field.name),
                data_function: format!("{}_{}", self.symbol, field.name),
                bound,
            }
            .render()
        })
    }

    /// Accessors of every field, in declaration order
    pub fn accessors(&self) -> Vec<String> {
        self.reply.fields().iter().map(|f| self.accessor(f)).collect()
    }

    /// Specializations of every list field, in declaration order
    pub fn specializations(&self) -> Vec<String> {
        self.reply.fields().iter().filter_map(|f| self.specialization(f)).collect()
    }

    /// Payload class carrying all accessors
    pub fn make_payload_class(&self) -> String { self.payload_class(self.accessors()) }

    /// Payload class around accessors already built by [`FieldAccessorGenerator::accessors`]
    pub fn payload_class(&self, accessors: Vec<String>) -> String {
        ReplyPayloadClass {
            class: self.class.clone(),
            reply_type: self.reply_type(),
            accessors,
            specializations: self.specializations(),
        }
        .render()
    }
}
