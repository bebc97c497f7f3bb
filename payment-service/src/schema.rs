diesel::table! {
    orders (id) {
        id -> Uuid,
        transaction_id -> Varchar,
        product_id -> Varchar,
        amount -> Numeric,
        customer_name -> Varchar,
        customer_email -> Varchar,
        customer_phone -> Varchar,
        shipping_address -> Text,
        status -> Varchar,
        return_url -> Nullable<Varchar>,
        created_at -> Nullable<Timestamptz>,
        updated_at -> Nullable<Timestamptz>,
    }
}
