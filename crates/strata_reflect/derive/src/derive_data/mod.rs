mod field_attributes;
mod reflect_struct;
mod type_attributes;

use field_attributes::FieldAttributes;
use type_attributes::TypeAttributes;

pub(crate) use reflect_struct::ReflectStruct;
