mod codec_test;
mod collection_test;
mod document_test;
