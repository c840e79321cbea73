mod azure_whisper_engine_test;
mod openai_whisper_engine_test;
mod recognition_engine_factory_test;
