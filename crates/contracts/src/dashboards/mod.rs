pub mod d402_ticket_sales_target;
