use crate::constants;
use crate::header_field;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ContentDisposition {
    pub(crate) field_name: Option<String>,
    pub(crate) file_name: Option<String>,
}

impl ContentDisposition {
    pub fn parse(line: &str) -> ContentDisposition {
        let field_name = header_field::extract(line, constants::FIELD_NAME_PARAM).map(|name| name.to_owned());

        let file_name = header_field::extract(line, constants::FILE_NAME_PARAM)
            .filter(|file_name| !file_name.is_empty())
            .map(|file_name| file_name.to_owned());

        ContentDisposition { field_name, file_name }
    }
}
